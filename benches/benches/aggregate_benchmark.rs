//! Aggregation benchmarks over synthetic tick streams.
//!
//! Run with: `cargo bench --package nazca-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nazca_aggregate::{RenkoBuilder, RenkoCache, ThresholdBuilder, merge_ticks};
use nazca_bench::synthetic_ticks;
use nazca_types::{EraLength, ThresholdAttr};
use rust_decimal::Decimal;

const SIZES: &[usize] = &[10_000, 100_000];

fn merge_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_ticks");
    for &size in SIZES {
        let ticks = synthetic_ticks(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ticks, |b, ticks| {
            b.iter(|| merge_ticks(ticks));
        });
    }
    group.finish();
}

fn renko_benchmark(c: &mut Criterion) {
    let builder = RenkoBuilder::new(Decimal::new(5, 2), 1, 10).unwrap();
    let mut group = c.benchmark_group("renko_build");
    for &size in SIZES {
        let samples = merge_ticks(&synthetic_ticks(size));
        let cache = RenkoCache {
            level: Decimal::new(100, 0),
            direction: None,
            next_day: None,
        };
        group.throughput(Throughput::Elements(samples.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &samples, |b, samples| {
            b.iter(|| builder.build(samples, cache.clone()).unwrap());
        });
    }
    group.finish();
}

fn threshold_benchmark(c: &mut Criterion) {
    let builder = ThresholdBuilder::new(
        ThresholdAttr::Notional,
        Decimal::new(50, 0),
        EraLength::Month,
        10,
    )
    .unwrap();
    let mut group = c.benchmark_group("threshold_build");
    for &size in SIZES {
        let samples = merge_ticks(&synthetic_ticks(size));
        let era_start = samples[0].timestamp;
        let cache = builder.initial_cache(era_start);
        group.throughput(Throughput::Elements(samples.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &samples, |b, samples| {
            b.iter(|| builder.build(samples, era_start, cache.clone()).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    merge_benchmark,
    renko_benchmark,
    threshold_benchmark
);
criterion_main!(benches);
