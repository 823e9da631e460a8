use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgqb::{Clause, Operand, SqlType, Table, table};

/// A table with `n` integer columns: col0, col1, ...
fn wide_table(n: usize) -> Table {
    let mut t = table("t");
    for i in 0..n {
        t.column(format!("col{i}"), SqlType::Integer);
    }
    t
}

/// col0 = 0 AND col1 = 1 AND ...
fn conjunction(t: &Table) -> Clause {
    let mut clause = Clause::from(true);
    for (i, col) in t.columns().iter().enumerate() {
        let predicate = Clause::new(col.eq(i as i64).expect("eq")).expect("clause");
        clause = clause.and(predicate);
    }
    clause
}

fn bench_expression(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/expression");

    for depth in [1, 5, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut expr = Operand::typed("age", SqlType::Integer);
                for i in 0..depth {
                    expr = if i % 2 == 0 {
                        expr.multiply(2).expect("multiply")
                    } else {
                        expr.add(1).expect("add")
                    };
                }
                black_box(expr.to_sql());
            });
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/select");

    for n in [1, 5, 10, 50] {
        let t = wide_table(n);
        let clause = conjunction(&t);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut t = t.clone();
            b.iter(|| {
                let fields = t.columns().to_vec();
                let sql = t
                    .select(fields)
                    .and_then(|t| t.where_(clause.clone()))
                    .and_then(|t| t.limit(10))
                    .and_then(|t| t.to_sql())
                    .expect("render");
                black_box(sql);
            });
        });
    }

    group.finish();
}

fn bench_insert_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/insert_rows");

    for rows in [1, 10, 100, 500] {
        let t = wide_table(4);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let mut t = t.clone();
            b.iter(|| {
                let fields = t.columns().to_vec();
                let values = (0..rows).map(|r| (0..4).map(move |c| (r * 4 + c) as i64));
                let sql = t
                    .insert(fields, values)
                    .and_then(|t| t.to_sql())
                    .expect("render");
                black_box(sql);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_expression, bench_select, bench_insert_rows);
criterion_main!(benches);
