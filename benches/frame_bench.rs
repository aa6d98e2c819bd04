//! Benchmarks for the series frame
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pulseboard::series::{Sample, SeriesFrame, TimeRange};

fn create_samples(count: usize) -> Vec<Sample> {
    (0..count)
        .map(|i| Sample::at(i as i64 * 60_000, 50_000.0 + (i % 100) as f64))
        .collect()
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [1_000, 10_000, 100_000] {
        let samples = create_samples(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("bulk_{}", size), |b| {
            b.iter(|| {
                let mut frame = SeriesFrame::new();
                frame.merge(black_box(samples.clone()))
            })
        });
    }

    // The steady-state case: one appended row into a populated frame.
    group.bench_function("append_one_into_100k", |b| {
        let frame = SeriesFrame::from_samples(create_samples(100_000));
        let next_ts = 100_000i64 * 60_000;

        b.iter(|| {
            let mut frame = frame.clone();
            frame.merge(black_box(vec![Sample::at(next_ts, 42.0)]))
        })
    });

    group.finish();
}

fn bench_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookups");

    let frame = SeriesFrame::from_samples(create_samples(100_000));
    let mid = 50_000i64 * 60_000 + 31_000;

    group.bench_function("nearest_100k", |b| {
        b.iter(|| frame.nearest(black_box(mid)))
    });

    group.bench_function("range_24h_100k", |b| {
        let range = TimeRange::try_new(mid, mid + 24 * 3600 * 1000).unwrap();
        b.iter(|| frame.range(black_box(range)).len())
    });

    group.bench_function("available_days_100k", |b| {
        b.iter(|| frame.available_days().len())
    });

    group.finish();
}

criterion_group!(benches, bench_merge, bench_lookups);
criterion_main!(benches);
