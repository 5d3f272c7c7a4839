//! Benchmarks for log2 normalization and bucketing.
//!
//! Run:
//! - cargo bench --bench log2_normalize

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use costfig::core::log_scale::{BucketNorm, Log2Norm, Normalizer, ScaleRange};
use costfig::core::surface::{SurfaceParams, constraint_surface};

const LENS: [usize; 3] = [1_024, 16_384, 262_144];

/// Values spread geometrically over 2^0..2^20.
fn make_values(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 2f64.powf(20.0 * i as f64 / len as f64))
        .collect()
}

fn bench_continuous(c: &mut Criterion) {
    let mut group = c.benchmark_group("log2_norm");
    group.sample_size(50);

    for &len in &LENS {
        let values = make_values(len);
        let norm = Log2Norm::new(ScaleRange::from_exponents(2, 18).unwrap()).with_clip(true);

        let id = BenchmarkId::new("normalize_all", format!("n{len}"));
        group.bench_with_input(id, &values, |b, values| {
            b.iter(|| black_box(norm.normalize_all(black_box(values)).unwrap()));
        });
    }

    group.finish();
}

fn bench_buckets(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_norm");
    group.sample_size(50);

    let norm = BucketNorm::new(ScaleRange::from_exponents(0, 20).unwrap(), 1).unwrap();
    for &len in &LENS {
        let values = make_values(len);

        let id = BenchmarkId::new("normalize", format!("n{len}"));
        group.bench_with_input(id, &values, |b, values| {
            b.iter(|| {
                let mut acc = 0.0;
                for &v in values.iter() {
                    acc += norm.normalize(v).unwrap();
                }
                black_box(acc);
            });
        });
    }

    group.finish();
}

fn bench_surface(c: &mut Criterion) {
    let params = SurfaceParams::default();
    c.bench_function("constraint_surface_default", |b| {
        b.iter(|| black_box(constraint_surface(black_box(&params)).unwrap()));
    });
}

criterion_group!(log2_normalize, bench_continuous, bench_buckets, bench_surface);
criterion_main!(log2_normalize);
