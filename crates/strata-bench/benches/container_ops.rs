//! Criterion micro-benchmarks for containers over each provider.

use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_arena::{ArenaAllocator, FreeListAllocator};
use strata_bench::scattered_keys;
use strata_collections::{ArenaVec, OrderedMap};

/// Benchmark: push 10K integers from the default capacity.
fn bench_vec_push_10k(c: &mut Criterion) {
    c.bench_function("vec_push_10k_arena", |b| {
        b.iter(|| {
            let mut v = ArenaVec::new_in(ArenaAllocator::default()).unwrap();
            v.try_extend(0..10_000u32).unwrap();
            black_box(v.len());
        });
    });

    c.bench_function("vec_push_10k_free_list", |b| {
        b.iter(|| {
            let mut v = ArenaVec::new_in(FreeListAllocator::default()).unwrap();
            v.try_extend(0..10_000u32).unwrap();
            black_box(v.len());
        });
    });
}

/// Benchmark: insert then look up 1K scattered keys.
fn bench_map_insert_1k(c: &mut Criterion) {
    let keys = scattered_keys(1_000);

    c.bench_function("map_insert_1k_arena", |b| {
        b.iter(|| {
            let mut map = OrderedMap::new_in(ArenaAllocator::default()).unwrap();
            for &k in &keys {
                map.insert(k, k).unwrap();
            }
            black_box(map.get(&500));
        });
    });

    c.bench_function("map_insert_1k_btreemap", |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            black_box(map.get(&500).copied());
        });
    });
}

criterion_group!(benches, bench_vec_push_10k, bench_map_insert_1k);
criterion_main!(benches);
