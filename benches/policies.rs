//! Policy comparison benchmarks.
//!
//! Run with: `cargo bench --bench policies`
//!
//! Measures per-operation latency for each policy under three shapes:
//! hit-heavy gets, miss-driven churn (every insert evicts), and a mixed
//! synthetic workload replayed through the cache.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cachelab::cache::PolicyCache;
use cachelab::config::{Distribution, PoissonParams, WeightedParams};
use cachelab::policy::PolicyKind;
use cachelab::workload::RequestGenerator;

const CAPACITY: usize = 1024;
const UNIVERSE: u32 = 4096;
const OPS: usize = 10_000;
const SEED: u64 = 42;

fn bench_get_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.throughput(Throughput::Elements(OPS as u64));

    for kind in PolicyKind::all() {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            let mut cache = PolicyCache::new(kind, CAPACITY);
            for i in 0..CAPACITY as u32 {
                cache.put(i, i);
            }
            b.iter(|| {
                for i in 0..OPS as u32 {
                    criterion::black_box(cache.get(&(i % CAPACITY as u32)));
                }
            });
        });
    }
    group.finish();
}

fn bench_put_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_churn");
    group.throughput(Throughput::Elements(OPS as u64));

    for kind in PolicyKind::all() {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter(|| {
                let mut cache = PolicyCache::new(kind, CAPACITY);
                // Monotonic keys: every put past capacity evicts.
                for i in 0..OPS as u32 {
                    cache.put(i, i);
                }
                criterion::black_box(cache.len())
            });
        });
    }
    group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
    let stream = RequestGenerator::new(
        (1, UNIVERSE),
        PoissonParams { lambda: UNIVERSE as f64 / 2.0 },
        WeightedParams {
            special_range: (UNIVERSE / 4, UNIVERSE / 3),
            special_probability: 0.43,
        },
        SEED,
    )
    .unwrap()
    .generate(Distribution::Mixed, OPS);

    let mut group = c.benchmark_group("mixed_workload");
    group.throughput(Throughput::Elements(stream.len() as u64));

    for kind in PolicyKind::all() {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &kind, |b, &kind| {
            b.iter(|| {
                let mut cache = PolicyCache::new(kind, CAPACITY);
                for &id in &stream {
                    if cache.get(&id).is_none() {
                        cache.put(id, id);
                    }
                }
                criterion::black_box(cache.stats().hits)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_get_hits, bench_put_churn, bench_mixed_workload);
criterion_main!(benches);
