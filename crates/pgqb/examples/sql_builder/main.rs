//! Build a handful of statements and print them.
//!
//! Run with: cargo run --example sql_builder -p pgqb

use pgqb::prelude::*;
use pgqb::{JoinKind, TracingSqlHook};

fn main() -> QbResult<()> {
    let mut users = table("users")
        .with_column("id", SqlType::BigSerial)
        .with_column("name", SqlType::Varchar(Some(64)))
        .with_column("age", SqlType::Integer)
        .with_column("created_at", SqlType::Timestamp { with_tz: true })
        .with_hook(TracingSqlHook::new());

    let orders = table("orders")
        .with_column("user_id", SqlType::BigInt)
        .with_column("total", SqlType::decimal(Some(12), Some(2))?)
        .with_alias("o");

    let id = users.col("id")?;
    let name = users.col("name")?;
    let age = users.col("age")?;
    let created_at = users.col("created_at")?;

    // SELECT with a compound predicate
    let recent = Clause::new(created_at.ge(Operand::raw("now()").subtract(Interval::new().days(7))?)?)?;
    let adult = Clause::new(age.ge(18)?)?;
    let sql = users
        .select([name.clone(), age.multiply(12)?.with_alias("months")])?
        .where_(adult.and(recent.or(false)))?
        .order_by(["-age", "name"])?
        .limit(20)?
        .to_sql()?;
    println!("{sql}");

    // JOIN + GROUP BY + HAVING
    let spent = orders.col("total")?.sum();
    let on = Clause::new(id.eq(orders.col("user_id")?)?)?;
    let sql = users
        .select([name.clone(), spent.clone().with_alias("spent")])?
        .join_kind(JoinKind::Left, &orders, Some(on))?
        .group_by([name.clone()])?
        .having(Clause::new(spent.gt(100)?)?)?
        .to_sql()?;
    println!("{sql}");

    // INSERT ... RETURNING
    let sql = users
        .insert(
            [name.clone(), age.clone()],
            [
                vec![Value::from("Nikita"), Value::from(23)],
                vec![Value::from("O'Hara"), Value::Null],
            ],
        )?
        .returning([id.clone()])?
        .to_sql()?;
    println!("{sql}");

    // UPDATE ... WHERE
    let sql = users
        .update([age.set(age.add(1)?)?])?
        .where_(Clause::new(id.is_in([1, 2, 3]))?)?
        .to_sql()?;
    println!("{sql}");

    // Faults reset the builder
    if let Err(err) = users.limit(5) {
        println!("refused: {err}");
    }
    println!("state after fault: {}", users.state());

    Ok(())
}
