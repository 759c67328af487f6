use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reelstats_core::{Dialect, FilterOptions, MemoryExecutor, QueryBuilder, QueryExecutor, SortKey};

fn bench_build_and_render(c: &mut Criterion) {
    let builder = QueryBuilder::default();
    let options = FilterOptions::new(100, SortKey::AverageRating, 1950).with_genre("Comedy");

    c.bench_function("build_plan", |b| {
        b.iter(|| builder.build(black_box(&options)))
    });

    let plan = builder.build(&options);
    c.bench_function("render_sqlite", |b| {
        b.iter(|| black_box(&plan).to_sql(Dialect::Sqlite))
    });
    c.bench_function("render_postgres", |b| {
        b.iter(|| black_box(&plan).to_sql(Dialect::Postgres))
    });
}

fn bench_memory_executor(c: &mut Criterion) {
    let mut exec = MemoryExecutor::new();
    for id in 0..2_000i64 {
        let genres = if id % 3 == 0 { "Comedy|Drama" } else { "Action" };
        exec.add_movie(id, format!("Movie {} ({})", id, 1950 + id % 70), genres);
        for r in 0..25 {
            exec.add_rating(id, f64::from((id as u32 + r) % 10 + 1) / 2.0);
        }
    }
    let plan = QueryBuilder::default()
        .build(&FilterOptions::new(10, SortKey::RatingCount, 1980).with_genre("comedy"));

    c.bench_function("memory_execute_50k_ratings", |b| {
        b.iter(|| exec.execute(black_box(&plan)).unwrap())
    });
}

criterion_group!(benches, bench_build_and_render, bench_memory_executor);
criterion_main!(benches);
