#![allow(missing_docs)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{RngCore, rng};

use thicket_merkle::{DigestContent, MerkleTree};

fn random_contents(count: usize) -> Vec<DigestContent> {
    (0..count)
        .map(|_| {
            let mut data = vec![0u8; 64];
            rng().fill_bytes(&mut data);
            DigestContent::from(data)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");

    for count in [16, 1024, 16_384].iter() {
        let contents = random_contents(*count);

        group.bench_with_input(BenchmarkId::new("plain", count), &contents, |b, contents| {
            b.iter(|| MerkleTree::new(contents.clone()).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("bloom", count), &contents, |b, contents| {
            b.iter(|| MerkleTree::with_bloom_filter(contents.clone(), 0.01).unwrap());
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_lookup");

    let contents = random_contents(4096);
    let tree = MerkleTree::with_bloom_filter(contents.clone(), 0.01).unwrap();
    let last = contents[contents.len() - 1].clone();
    let absent = random_contents(1).remove(0);

    group.bench_function("linear_present", |b| {
        b.iter(|| tree.locate_linear(&last).unwrap());
    });

    group.bench_function("filtered_present", |b| {
        b.iter(|| tree.locate_filtered(&last).unwrap());
    });

    group.bench_function("linear_absent", |b| {
        b.iter(|| tree.locate_linear(&absent).unwrap());
    });

    group.bench_function("filtered_absent", |b| {
        b.iter(|| tree.locate_filtered(&absent).unwrap());
    });

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_verify");

    let contents = random_contents(4096);
    let tree = MerkleTree::with_bloom_filter(contents.clone(), 0.01).unwrap();
    let query = contents[1234].clone();

    group.bench_function("tree", |b| {
        b.iter(|| tree.verify_tree().unwrap());
    });

    group.bench_function("content", |b| {
        b.iter(|| tree.verify_content(&query).unwrap());
    });

    group.bench_function("multi_proof", |b| {
        b.iter(|| tree.multi_proof(&query).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_lookup, bench_verify);
criterion_main!(benches);
