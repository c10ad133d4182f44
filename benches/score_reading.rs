//! Scoring benchmarks
//!
//! Run with: cargo bench --bench score_reading

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use env_scorer::reading::{ideal_greenhouse, stressed_field};
use env_scorer::{evaluate, evaluate_batch, EnvironmentalReading, EnvironmentalScorer};

fn bench_single(c: &mut Criterion) {
    let ideal = ideal_greenhouse();
    let stressed = stressed_field();

    c.bench_function("evaluate_ideal", |b| b.iter(|| evaluate(black_box(&ideal))));
    c.bench_function("evaluate_stressed", |b| b.iter(|| evaluate(black_box(&stressed))));

    let mut scorer = EnvironmentalScorer::new();
    c.bench_function("score_with_history", |b| b.iter(|| scorer.score(black_box(&stressed))));
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_batch");
    for size in [16usize, 256, 4096] {
        let readings: Vec<EnvironmentalReading> = (0..size)
            .map(|i| {
                let t = i as f64 / size as f64;
                EnvironmentalReading::new(10.0 + 25.0 * t, 20.0 + 70.0 * t, 4.5 + 4.0 * t, 100_000.0 * t)
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &readings, |b, readings| {
            b.iter(|| evaluate_batch(black_box(readings)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single, bench_batch);
criterion_main!(benches);
