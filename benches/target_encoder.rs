use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use targetenc_rs::backend::CpuBackend;
use targetenc_rs::dataset::{make_target_encoding_dataset, SyntheticConfig};
use targetenc_rs::preprocessing::{FittedTransformer, SupervisedTransformer, TargetEncoder};

fn dataset(n: usize) -> targetenc_rs::dataset::CategoricalDataset<CpuBackend> {
    let config = SyntheticConfig {
        n_samples: n,
        ..SyntheticConfig::default()
    };
    make_target_encoding_dataset(&config).expect("valid synthetic config")
}

fn bench_fit_transform(c: &mut Criterion) {
    for size in [1_000, 10_000, 50_000].iter() {
        c.bench_with_input(BenchmarkId::new("fit_transform_cv5", size), size, |b, &n| {
            let ds = dataset(n);
            let encoder = TargetEncoder::<CpuBackend>::new().with_random_state(0);

            b.iter(|| {
                let out = encoder
                    .fit_transform(black_box(&ds.x), black_box(&ds.y))
                    .expect("fit_transform");
                black_box(out);
            });
        });
    }
}

fn bench_transform(c: &mut Criterion) {
    for size in [1_000, 10_000, 50_000].iter() {
        c.bench_with_input(BenchmarkId::new("transform", size), size, |b, &n| {
            let ds = dataset(n);
            let fitted = TargetEncoder::<CpuBackend>::new()
                .fit(&ds.x, &ds.y)
                .expect("fit");

            b.iter(|| {
                let out = fitted.transform(black_box(&ds.x)).expect("transform");
                black_box(out);
            });
        });
    }
}

criterion_group!(benches, bench_fit_transform, bench_transform);
criterion_main!(benches);
