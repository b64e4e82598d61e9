#![allow(missing_docs)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{RngCore, rng};

use thicket_bloom::{BloomFilter, locations};

fn random_items(count: usize, len: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|_| {
            let mut item = vec![0u8; len];
            rng().fill_bytes(&mut item);
            item
        })
        .collect()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom_add");

    for len in [32, 256, 4096].iter() {
        let item = random_items(1, *len).remove(0);
        let mut filter = BloomFilter::with_estimates(10_000, 0.01);

        group.bench_with_input(BenchmarkId::from_parameter(len), &item, |b, item| {
            b.iter(|| {
                filter.add(item);
            });
        });
    }

    group.finish();
}

fn bench_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom_test");

    let items = random_items(10_000, 32);
    let mut filter = BloomFilter::with_estimates(items.len(), 0.01);
    for item in &items {
        filter.add(item);
    }
    let absent = random_items(1, 32).remove(0);

    group.bench_function("present", |b| {
        b.iter(|| filter.test(&items[0]));
    });

    group.bench_function("absent", |b| {
        b.iter(|| filter.test(&absent));
    });

    let locs = locations(&items[0], filter.hash_count());
    group.bench_function("locations", |b| {
        b.iter(|| filter.test_locations(&locs));
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom_merge");

    for n in [100, 10_000].iter() {
        let mut left = BloomFilter::with_estimates(*n, 0.01);
        let mut right = left.clone();
        for item in random_items(*n, 32) {
            left.add(&item);
            right.add(item.iter().rev().copied().collect::<Vec<_>>());
        }

        group.bench_with_input(BenchmarkId::from_parameter(n), &right, |b, right| {
            b.iter(|| {
                let mut merged = left.clone();
                merged.merge(right).unwrap();
                merged
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add, bench_test, bench_merge);
criterion_main!(benches);
