//! Squared-distance kernel and region-query benchmarks
//!
//! Run with: cargo bench --bench kernel

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndscan::space::dense::DenseCorpus;
use ndscan::space::kernel::{squared_distance, squared_distance_scalar};
use ndscan::space::space_generics::RegionQuery;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

fn bench_kernel_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("squared_distance_f32");
    let mut rng = StdRng::seed_from_u64(42);

    for dim in [64, 128, 256, 512] {
        let a: Vec<f32> = (0..dim).map(|_| rng.gen::<f32>()).collect();
        let b: Vec<f32> = (0..dim).map(|_| rng.gen::<f32>()).collect();

        group.bench_with_input(BenchmarkId::new("selected", dim), &dim, |bench, _| {
            bench.iter(|| squared_distance(black_box(&a), black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("scalar", dim), &dim, |bench, _| {
            bench.iter(|| squared_distance_scalar(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

fn bench_kernel_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("squared_distance_f64");
    let mut rng = StdRng::seed_from_u64(43);

    for dim in [64, 128, 256, 512] {
        let a: Vec<f64> = (0..dim).map(|_| rng.gen::<f64>()).collect();
        let b: Vec<f64> = (0..dim).map(|_| rng.gen::<f64>()).collect();

        group.bench_with_input(BenchmarkId::new("selected", dim), &dim, |bench, _| {
            bench.iter(|| squared_distance(black_box(&a), black_box(&b)))
        });
        group.bench_with_input(BenchmarkId::new("scalar", dim), &dim, |bench, _| {
            bench.iter(|| squared_distance_scalar(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

fn bench_region_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_region_query");
    let mut rng = StdRng::seed_from_u64(44);
    let rows = 2000;

    for dim in [16, 128] {
        let data: Vec<f32> = (0..rows * dim).map(|_| rng.gen::<f32>()).collect();
        let corpus = DenseCorpus::new(&data, rows, dim).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |bench, _| {
            bench.iter(|| corpus.region_query(black_box(0), 0.5f32).unwrap().len())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kernel_f32, bench_kernel_f64, bench_region_query);
criterion_main!(benches);
