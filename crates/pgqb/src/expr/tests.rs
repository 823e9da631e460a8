use super::*;
use crate::types::Interval;

fn column(name: &str, ty: SqlType) -> Operand {
    let mut op = Operand::typed(name, ty);
    op.bind(Some("users"), None);
    op
}

fn age() -> Operand {
    column("age", SqlType::Integer)
}

fn name() -> Operand {
    column("name", SqlType::Text)
}

#[test]
fn reference_rendering() {
    let x = Operand::reference("x");
    assert_eq!(x.to_sql(), r#""x""#);

    let mut qualified = Operand::reference("x");
    qualified.bind(Some("t"), None);
    assert_eq!(qualified.to_sql(), r#""t"."x""#);

    assert_eq!(x.clone().with_alias("a").to_sql(), r#""x" AS "a""#);

    let mut deep = Operand::reference("x");
    deep.bind(Some("t"), Some("s"));
    assert_eq!(deep.to_string(), r#""s"."t"."x""#);
}

#[test]
fn higher_precedence_operations_group_their_operands() {
    let age = Operand::typed("age", SqlType::Integer);
    let expr = age.multiply(2).unwrap().multiply(3).unwrap().divide(2).unwrap();
    assert_eq!(expr.to_sql(), r#"(("age" * 2) * 3) / 2"#);

    let sum_then_product = age.add(1).unwrap().multiply(2).unwrap();
    assert_eq!(sum_then_product.to_sql(), r#"("age" + 1) * 2"#);

    let product_then_sum = age.multiply(2).unwrap().add(1).unwrap();
    assert_eq!(product_then_sum.to_sql(), r#""age" * 2 + 1"#);
}

#[test]
fn alias_moves_to_function_wrapper() {
    let x = Operand::reference("x").with_alias("n");
    let wrapped = x.wrap_function("upper", vec![], false).unwrap();
    assert_eq!(wrapped.to_sql(), r#"upper("x") AS "n""#);
    assert_eq!(wrapped.alias(), Some("n"));

    let helper = Operand::reference("x").with_alias("n").upper();
    assert_eq!(helper.to_sql(), r#"upper("x") AS "n""#);
}

#[test]
fn alias_is_dropped_inside_operations() {
    let a = age().with_alias("years");
    let expr = a.add(1).unwrap();
    assert_eq!(expr.to_sql(), r#""users"."age" + 1"#);
    assert_eq!(a.to_sql(), r#""users"."age" AS "years""#);
}

#[test]
fn reflected_operations_swap_sides() {
    assert_eq!(age().rsubtract(7).unwrap().to_sql(), r#"7 - "users"."age""#);
    assert_eq!(age().rdivide(1.5).unwrap().to_sql(), r#"1.5 / "users"."age""#);

    let greeting = name().rconcat("hello WORLD! ").unwrap();
    assert_eq!(greeting.to_sql(), r#"'hello WORLD! ' || "users"."name""#);
    assert_eq!(
        greeting.upper().to_sql(),
        r#"upper('hello WORLD! ' || "users"."name")"#
    );
}

#[test]
fn prefixed_name_in_function() {
    let expr = name().rconcat("prefix_").unwrap().upper().with_alias("tag");
    assert_eq!(expr.to_sql(), r#"upper('prefix_' || "users"."name") AS "tag""#);
}

#[test]
fn numeric_operations() {
    let dec = Operand::typed("decimal", SqlType::decimal(Some(10), Some(2)).unwrap());
    assert_eq!(dec.clone().floor_div(2).unwrap().to_sql(), r#"div("decimal", 2)"#);
    assert_eq!(dec.power(2.0).unwrap().to_sql(), r#""decimal" ^ 2.0"#);
    assert_eq!(dec.modulo(3).unwrap().to_sql(), r#""decimal" % 3"#);
    assert_eq!(dec.clone().log(10).unwrap().to_sql(), r#"log(10, "decimal")"#);
    assert_eq!(dec.clone().round(1).unwrap().to_sql(), r#"round("decimal", 1)"#);
    assert_eq!(dec.clone().abs().to_sql(), r#"abs("decimal")"#);
    assert_eq!(dec.shift_left(1).unwrap().to_sql(), r#""decimal" << 1"#);
    assert_eq!(dec.neg().unwrap().to_sql(), r#"-"decimal""#);
}

#[test]
fn negating_an_operation_groups_it() {
    let expr = age().add(1).unwrap().neg().unwrap();
    assert_eq!(expr.to_sql(), r#"-("users"."age" + 1)"#);
}

#[test]
fn literal_on_the_left() {
    let two = Operand::literal(2);
    assert_eq!(two.kind(), OperandKind::Literal);
    assert_eq!(two.multiply(age()).unwrap().to_sql(), r#"2 * "users"."age""#);
}

#[test]
fn comparisons_produce_booleans() {
    let cmp = age().ge(18).unwrap();
    assert_eq!(cmp.to_sql(), r#""users"."age" >= 18"#);
    assert_eq!(cmp.column_type().category(), TypeCategory::Boolean);
    assert_eq!(age().ne(name()).unwrap().to_sql(), r#""users"."age" != "users"."name""#);
    assert_eq!(name().eq("O'Reilly").unwrap().to_sql(), r#""users"."name" = 'O''Reilly'"#);
    assert_eq!(name().ilike("%a%").unwrap().to_sql(), r#""users"."name" ILIKE '%a%'"#);
}

#[test]
fn derived_names() {
    let other = column("other", SqlType::Integer);
    assert_eq!(age().add(&other).unwrap().name(), "age_other");
    assert_eq!(age().add(1).unwrap().name(), "age");
    let op = age().add(1).unwrap();
    assert_eq!(op.table(), None);
    assert_eq!(op.kind(), OperandKind::Operation);
}

#[test]
fn predicates() {
    assert_eq!(age().is_null().to_sql(), r#""users"."age" IS NULL"#);
    assert_eq!(age().is_not_null().to_sql(), r#""users"."age" IS NOT NULL"#);
    assert_eq!(age().between(1, 10).to_sql(), r#""users"."age" BETWEEN 1 AND 10"#);
    assert_eq!(name().is_in(["a", "b"]).to_sql(), r#""users"."name" IN ('a', 'b')"#);
    assert_eq!(age().not_in(Vec::<i32>::new()).to_sql(), "1=1");
    assert_eq!(age().is_in(Vec::<i32>::new()).to_sql(), "1=0");
}

#[test]
fn temporal_arithmetic() {
    let created = Operand::typed("created", SqlType::Timestamp { with_tz: false });
    let later = created.add(Interval::new().days(1)).unwrap();
    assert_eq!(later.to_sql(), r#""created" + interval '1 days'"#);

    let updated = Operand::typed("updated", SqlType::Timestamp { with_tz: false });
    assert_eq!(
        updated.subtract(&created).unwrap().to_sql(),
        r#""updated" - "created""#
    );
    assert!(created.add(1).unwrap_err().is_operand_type());
}

#[test]
fn cast_takes_alias_and_type() {
    let cast = age().with_alias("a").cast(SqlType::Text);
    assert_eq!(cast.to_sql(), r#"cast("users"."age" as text) AS "a""#);
    assert_eq!(cast.column_type().sql_name(), "text");
    assert_eq!(cast.kind(), OperandKind::FunctionCall);
    assert!(cast.concat("!").is_ok());
}

#[test]
fn operand_type_faults() {
    let err = name().multiply(2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported operand type(s) for *: 'text' and 'integer'"
    );

    let err = age().concat("x").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported operand type(s) for ||: 'integer' and 'text'"
    );

    assert!(age().like("x").is_err());
    assert!(name().like(3).is_err());
    assert!(age().add("1").is_err());
    assert!(name().clone().floor_div(2).is_err());

    let err = name().neg().unwrap_err();
    assert_eq!(err.to_string(), "bad operand type for unary -: 'text'");
    assert!(age().not().is_err());
}

#[test]
fn structured_concat_needs_structured_right_side() {
    let doc = Operand::typed("doc", SqlType::Jsonb);
    let patch = Operand::typed("patch", SqlType::Jsonb);
    assert_eq!(doc.concat(&patch).unwrap().to_sql(), r#""doc" || "patch""#);
    assert!(doc.concat(name()).is_err());
    assert_eq!(
        doc.concat(serde_json::json!({"a": 1})).unwrap().to_sql(),
        r#""doc" || '{"a":1}'"#
    );
}

#[test]
fn equality_checks_constraints() {
    let code = Operand::typed("code", SqlType::Varchar(Some(2)));
    let err = code.eq("abc").unwrap_err();
    assert!(err.is_constraint_violation());
    assert!(code.eq("ab").is_ok());
    assert!(code.ne("abc").is_ok());
}

#[test]
fn function_names_are_validated() {
    let err = age().wrap_function("drop table", vec![], false).unwrap_err();
    assert!(err.is_value());
    let custom = age()
        .wrap_function("greatest", vec![Value::from(0), Value::from(1)], false)
        .unwrap();
    assert_eq!(custom.to_sql(), r#"greatest("users"."age", 0, 1)"#);
}

#[test]
fn aggregates() {
    assert_eq!(age().count().column_type().sql_name(), "bigint");
    assert_eq!(age().sum().to_sql(), r#"sum("users"."age")"#);
    assert_eq!(age().avg().column_type().sql_name(), "numeric");
    assert_eq!(name().array_agg().to_sql(), r#"array_agg("users"."name")"#);
    assert_eq!(
        name().coalesce("n/a").unwrap().to_sql(),
        r#"coalesce("users"."name", 'n/a')"#
    );
    assert_eq!(name().lower().length().column_type().sql_name(), "integer");
}

#[test]
fn raw_expressions_pass_through() {
    let raw = Operand::raw("now()");
    assert_eq!(raw.kind(), OperandKind::Raw);
    assert_eq!(raw.subtract(Interval::new()).unwrap().to_sql(), "now() - interval '1 seconds'");
}

#[test]
fn double_negation_never_emits_a_comment_marker() {
    assert_eq!(age().neg().unwrap().neg().unwrap().to_sql(), r#"-(-"users"."age")"#);
    assert_eq!(Operand::literal(-5).neg().unwrap().to_sql(), "-(-5)");
    assert_eq!(Operand::literal(5).neg().unwrap().to_sql(), "-5");
    assert_eq!(Operand::raw("-x").neg().unwrap().to_sql(), "-(-x)");
}

#[test]
fn aliases_are_dropped_inside_in_and_between() {
    let min_age = column("min_age", SqlType::Integer).with_alias("lo");
    assert_eq!(
        age().between(min_age.clone(), 10).to_sql(),
        r#""users"."age" BETWEEN "users"."min_age" AND 10"#
    );
    assert_eq!(
        age().is_in([Value::from(min_age), Value::from(3)]).to_sql(),
        r#""users"."age" IN ("users"."min_age", 3)"#
    );
}

#[test]
fn decimal_precision_is_checked_on_equality() {
    let price = Operand::typed("price", SqlType::decimal(Some(5), Some(2)).unwrap());
    assert!(price.eq(123_456_789).unwrap_err().is_constraint_violation());
    assert!(price.eq(123.45).is_ok());

    let money = Operand::typed("m", SqlType::Money);
    assert!(money.eq(10.255).unwrap_err().is_constraint_violation());
}

#[test]
fn operands_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Operand>();
    assert_send_sync::<Value>();
}
