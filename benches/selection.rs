use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use polyridge::model::{NormalizedRegressor, RidgeRegression};
use polyridge::selection::{build_model, SelectionConfig};

/// Noisy cubic on `n` evenly spaced points.
fn synthetic(n: usize) -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_fn((n, 1), |(i, _)| i as f64 / n as f64 * 6.0 - 3.0);
    let y = Array1::from_shape_fn(n, |i| {
        let v = i as f64 / n as f64 * 6.0 - 3.0;
        0.3 * v * v * v - v + 0.1 * (((i * 31) % 17) as f64 - 8.0)
    });
    (x, y)
}

fn bench_normalized_fit(c: &mut Criterion) {
    for degree in [1, 2, 4].iter() {
        c.bench_with_input(BenchmarkId::new("normalized_fit", degree), degree, |b, &d| {
            let (x, y) = synthetic(1000);
            b.iter(|| {
                let fitted = NormalizedRegressor::fit(
                    &RidgeRegression::new(),
                    black_box(&x),
                    black_box(&y),
                    0.1,
                    d,
                    false,
                )
                .unwrap();
                black_box(fitted);
            });
        });
    }
}

fn bench_partition_selection(c: &mut Criterion) {
    // Test different dataset sizes with 10-row folds
    for size in [50, 200, 1000].iter() {
        c.bench_with_input(BenchmarkId::new("partition_selection", size), size, |b, &n| {
            let (x, y) = synthetic(n);
            let config = SelectionConfig::default().validation_size(n / 10);
            b.iter(|| {
                let selector = build_model(x.clone(), y.clone(), black_box(&config)).unwrap();
                black_box(selector.best_degree());
            });
        });
    }
}

fn bench_bootstrap_selection(c: &mut Criterion) {
    for size in [60, 300, 1500].iter() {
        c.bench_with_input(BenchmarkId::new("bootstrap_selection", size), size, |b, &n| {
            let (x, y) = synthetic(n);
            let config = SelectionConfig::default()
                .validation_size(0)
                .bootstrap_size(n / 3)
                .bootstrap_runs(10);
            b.iter(|| {
                let selector = build_model(x.clone(), y.clone(), black_box(&config)).unwrap();
                black_box(selector.best_degree());
            });
        });
    }
}

criterion_group!(
    benches,
    bench_normalized_fit,
    bench_partition_selection,
    bench_bootstrap_selection
);
criterion_main!(benches);
