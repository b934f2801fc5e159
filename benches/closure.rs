//! Benchmarks of the even-step closure pipeline.
//!
//! Run with:
//! ```bash
//! cargo bench --bench closure
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use even_reach::bdd::BddConfig;
use even_reach::config::GraphConfig;
use even_reach::pipeline::Pipeline;

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for size in [8, 32, 128, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let pipeline = Pipeline::new(GraphConfig::for_size(size)).unwrap();
                pipeline.run().unwrap()
            });
        });
    }
    group.finish();
}

fn bench_cache_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("closure_cache_bits");
    for bits in [8, 12, 16, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(bits), &bits, |b, &bits| {
            let config = GraphConfig::for_size(256).with_bdd_config(BddConfig::default().with_cache_bits(bits));
            b.iter(|| {
                let pipeline = Pipeline::new(config.clone()).unwrap();
                let base = pipeline.base_relation().unwrap();
                pipeline.closure(base).unwrap().iterations()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_cache_size);
criterion_main!(benches);
