//! Benchmarks for unit matching and tolerance sweeps

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use segmatch_core::{extract_units, overlap_matrix, overlap_matrix_brute_force, prf_star, Labels};
use std::hint::black_box;

/// Generate a label stream with `units` signs of varying length and class
fn generate_labels(units: usize, jitter: usize) -> Vec<usize> {
    let mut labels = Vec::with_capacity(units * 16);
    for i in 0..units {
        let gap = 2 + (i * 7 + jitter) % 5;
        let len = 4 + (i * 13 + jitter) % 9;
        let class = 1 + (i * 3 + jitter) % 6;
        labels.extend(std::iter::repeat(0).take(gap));
        labels.extend(std::iter::repeat(class).take(len));
    }
    labels
}

/// Predictions are the same stream with shifted boundaries
fn generate_pair(units: usize) -> (Vec<usize>, Vec<usize>) {
    let truth = generate_labels(units, 0);
    let mut pred = truth.clone();
    pred.rotate_right(2);
    (truth, pred)
}

fn bench_overlap_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_matrix");

    for units in [10, 100, 1000] {
        let (truth, pred) = generate_pair(units);
        let true_units = extract_units(&truth);
        let pred_units = extract_units(&pred);
        group.throughput(Throughput::Elements(units as u64));

        group.bench_with_input(
            BenchmarkId::new("pruned", units),
            &(&true_units, &pred_units),
            |b, (t, p)| b.iter(|| overlap_matrix(black_box(t), black_box(p))),
        );

        group.bench_with_input(
            BenchmarkId::new("brute_force", units),
            &(&true_units, &pred_units),
            |b, (t, p)| b.iter(|| overlap_matrix_brute_force(black_box(t), black_box(p))),
        );
    }

    group.finish();
}

fn bench_prf_star(c: &mut Criterion) {
    let mut group = c.benchmark_group("prf_star");

    for units in [10, 100, 1000] {
        let (truth, pred) = generate_pair(units);
        group.throughput(Throughput::Elements(truth.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("step_0.01", units),
            &(&truth, &pred),
            |b, (t, p)| {
                b.iter(|| {
                    prf_star(
                        black_box(&Labels::classes(t)),
                        black_box(&Labels::classes(p)),
                        0.01,
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_overlap_matrix, bench_prf_star);
criterion_main!(benches);
