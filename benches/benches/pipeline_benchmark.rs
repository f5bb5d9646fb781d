//! Pipeline benchmarks: resampling, sizing, brick building and cached renders.
//!
//! Run with: `cargo bench --package renko-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use renko_bench::{SeriesConfig, synthetic_ticks, write_tick_csv};
use renko_lib::prelude::*;
use std::hint::black_box;
use tempfile::TempDir;

const SIZES: [usize; 3] = [10_000, 100_000, 1_000_000];

fn resample_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");

    for size in SIZES {
        let ticks = synthetic_ticks(&SeriesConfig::default().with_ticks(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ticks, |b, ticks| {
            b.iter(|| resample(black_box(ticks), Timeframe::Minute1).unwrap());
        });
    }

    group.finish();
}

fn sizing_and_build_benchmark(c: &mut Criterion) {
    let ticks = synthetic_ticks(&SeriesConfig::default().with_ticks(1_000_000));
    let bars = resample(&ticks, Timeframe::Second1).unwrap();

    let mut group = c.benchmark_group("bricks");
    group.throughput(Throughput::Elements(bars.len() as u64));

    for strategy in [BrickStrategy::Atr, BrickStrategy::Statistical] {
        let sizer = BrickSizer::new(strategy);
        group.bench_function(BenchmarkId::new("estimate", strategy), |b| {
            b.iter(|| sizer.estimate(black_box(&bars)).unwrap());
        });
    }

    let size = BrickSizer::default().estimate(&bars).unwrap().size;
    let builder = RenkoBuilder::default();
    group.bench_function("build", |b| {
        b.iter(|| builder.build(black_box(&bars), size).unwrap());
    });

    group.finish();
}

fn engine_benchmark(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let ticks = synthetic_ticks(&SeriesConfig::default());
    write_tick_csv(dir.path(), "eurusd.csv", &ticks);

    let engine = RenkoEngine::new(DirectorySource::new(dir.path()), EngineConfig::default()).unwrap();

    let mut group = c.benchmark_group("engine");
    group.sample_size(20);
    group.throughput(Throughput::Elements(ticks.len() as u64));

    group.bench_function("refresh", |b| {
        b.iter(|| engine.refresh(black_box("eurusd")).unwrap());
    });

    engine.render("eurusd").unwrap();
    group.bench_function("cached", |b| {
        b.iter(|| engine.render(black_box("eurusd")).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    resample_benchmark,
    sizing_and_build_benchmark,
    engine_benchmark
);
criterion_main!(benches);
