//! Benchmarks for bucket hashing and index queries.
//!
//! Hashing dominates `add`; query cost is hashing plus the bucket expansion,
//! which these benches exercise against the in-memory store at a few recall
//! boost settings.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cosann::{bucket, generate_basis, CosineAnnIndex, IndexParams, MemoryStore};

fn random_vectors(n: usize, dims: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..dims).map(|_| rng.random::<f32>() * 2.0 - 1.0).collect())
        .collect()
}

fn bench_bucket_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_hash");

    for dims in [64, 256, 768] {
        group.throughput(Throughput::Elements(dims as u64));
        let basis = generate_basis(dims, 16);
        let v = &random_vectors(1, dims, 7)[0];

        group.bench_with_input(BenchmarkId::from_parameter(dims), &dims, |bench, _| {
            bench.iter(|| bucket(black_box(v), black_box(&basis)));
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let dims = 64;
    let vectors = random_vectors(1000, dims, 42);
    let idx = CosineAnnIndex::new(MemoryStore::new(), IndexParams::new(dims).with_bits(10))
        .expect("valid params");
    for (id, v) in vectors.iter().enumerate() {
        idx.add(id as u64, v).expect("add");
    }
    let query = &vectors[0];

    for boost in [0u32, 1, 2] {
        group.bench_with_input(
            BenchmarkId::new("recall_boost", boost),
            &boost,
            |bench, &boost| {
                bench.iter(|| {
                    idx.query(0, black_box(query), 10, boost)
                        .expect("query")
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_bucket_hash, bench_query);
criterion_main!(benches);
