//! Container performance benchmarks.
//!
//! Measures the hot paths of the core containers against the crates the
//! rest of the ecosystem reaches for:
//! - `Array::push_back` vs `Vec::push` (growth schedule)
//! - `HashMap` insert and lookup vs `hashbrown::HashMap`
//! - `hash64` vs `fxhash` and `ahash` on integer keys
//! - `ByteString` creation and digest

use std::hash::BuildHasher;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use xc_core::{Array, ByteString, HashMap, hash64};

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("push");

    for size in [16, 1_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("array", size), size, |b, &size| {
            b.iter(|| {
                let mut array = Array::new();
                for i in 0..size {
                    array.push_back(black_box(i));
                }
                array
            });
        });

        group.bench_with_input(BenchmarkId::new("vec", size), size, |b, &size| {
            b.iter(|| {
                let mut vec = Vec::new();
                for i in 0..size {
                    vec.push(black_box(i));
                }
                vec
            });
        });
    }

    group.finish();
}

fn bench_map_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert");

    for size in [100, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("xc", size), size, |b, &size| {
            b.iter(|| {
                let mut map = HashMap::new();
                for key in 0..size as u64 {
                    map.insert(key, key);
                }
                map
            });
        });

        group.bench_with_input(BenchmarkId::new("hashbrown", size), size, |b, &size| {
            b.iter(|| {
                let mut map = hashbrown::HashMap::new();
                for key in 0..size as u64 {
                    map.insert(key, key);
                }
                map
            });
        });
    }

    group.finish();
}

fn bench_map_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_find");
    let size = 10_000u64;

    let mut xc = HashMap::new();
    let mut brown = hashbrown::HashMap::new();
    for key in 0..size {
        xc.insert(key, key);
        brown.insert(key, key);
    }

    group.bench_function("xc", |b| {
        b.iter(|| {
            for key in 0..size {
                black_box(xc.find(&key));
            }
        });
    });

    group.bench_function("hashbrown", |b| {
        b.iter(|| {
            for key in 0..size {
                black_box(brown.get(&key));
            }
        });
    });

    group.finish();
}

fn bench_hash_u64(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_u64");
    let seeded = ahash::RandomState::with_seeds(1, 2, 3, 4);

    group.bench_function("hash64", |b| {
        b.iter(|| {
            for key in 0..1_000u64 {
                black_box(hash64(black_box(key)));
            }
        });
    });

    group.bench_function("fxhash", |b| {
        b.iter(|| {
            for key in 0..1_000u64 {
                black_box(fxhash::hash64(&black_box(key)));
            }
        });
    });

    group.bench_function("ahash", |b| {
        b.iter(|| {
            for key in 0..1_000u64 {
                black_box(seeded.hash_one(black_box(key)));
            }
        });
    });

    group.finish();
}

fn bench_byte_string(c: &mut Criterion) {
    let names: Vec<String> = (0..1_000).map(|i| format!("VK_LAYER_{i}")).collect();

    c.bench_function("byte_string_from_and_digest", |b| {
        b.iter(|| {
            for name in &names {
                let s = ByteString::from(name.as_str());
                black_box(s.digest());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_push,
    bench_map_insert,
    bench_map_find,
    bench_hash_u64,
    bench_byte_string
);
criterion_main!(benches);
