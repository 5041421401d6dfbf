use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use querykit::{Query, StandardDriver};

/// SELECT col0, col1, ... FROM t WHERE col0 = 0 AND col1 = 1 ... ORDER BY col0
fn build_select(n: usize) -> Query {
    let mut q = Query::with_driver(StandardDriver::postgres().into_shared());
    for i in 0..n {
        q.select(format!("col{i}"));
        q.where_(format!("col{i} = {i}"));
    }
    q.from("t").expect("plain table").order("col0").set_limit(10, 0);
    q
}

fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/to_sql");

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.to_sql()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).to_sql()));
        });
    }

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/format");
    let q = Query::with_driver(StandardDriver::mysql().into_shared());

    for n in [1, 5, 20, 100] {
        let template = vec!["%n = %q"; n].join(" AND ");
        let args: Vec<String> = (0..n).flat_map(|i| [format!("c{i}"), format!("v'{i}")]).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(q.format(&template, args.as_slice()).expect("driver bound")));
        });
    }

    group.finish();
}

fn bench_clone_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/clone");

    for depth in [1, 4, 16] {
        let mut q = build_select(5);
        for _ in 0..depth {
            let mut outer = q.fresh();
            outer.union(q);
            q = outer;
        }
        group.bench_with_input(BenchmarkId::from_parameter(depth), &q, |b, q| {
            b.iter(|| black_box(q.clone()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_to_sql,
    bench_build_and_render,
    bench_format,
    bench_clone_deep
);
criterion_main!(benches);
