use std::hint::black_box;

use covtrend::types::RunSeries;
use covtrend::{align, confidence};
use criterion::{Criterion, criterion_group, criterion_main};

/// A run that discovers something every few seconds with diminishing returns
fn synthetic_run(seed: u64, entries: usize) -> RunSeries {
    let mut series = RunSeries::new();
    let mut time = 0.0;
    for i in 0..entries {
        time += 1.0 + ((seed + i as u64) % 7) as f64;
        let coverage = 100.0 * (1.0 - 1.0 / (2.0 + i as f64).ln());
        series.push(time, coverage.max(0.0));
    }
    series
}

fn bench_align_and_confidence(c: &mut Criterion) {
    let group: Vec<RunSeries> = (0..10).map(|seed| synthetic_run(seed, 2_000)).collect();

    c.bench_function("align 10 runs x 2000 entries", |b| {
        b.iter(|| align(black_box(&group)))
    });

    let matrix = align(&group).expect("synthetic runs are non-empty");
    c.bench_function("confidence 10 x 20000 points", |b| {
        b.iter(|| confidence(black_box(&matrix), "bench".to_string()))
    });
}

criterion_group!(benches, bench_align_and_confidence);
criterion_main!(benches);
