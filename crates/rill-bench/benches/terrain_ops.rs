//! Criterion benchmarks for terrain generation and snapshots.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rill_bench::{reference_profile, TERRAIN_RANGE};
use rill_snapshot::{decode, encode, terrain_hash};
use rill_terrain::Terrain;

fn bench_generate(c: &mut Criterion) {
    let mut terrain = Terrain::new(256).unwrap();
    c.bench_function("generate_heights_256", |b| {
        b.iter(|| {
            terrain.generate_heights(black_box(3), TERRAIN_RANGE);
        });
    });
}

fn bench_smooth(c: &mut Criterion) {
    let mut terrain = reference_profile(3).unwrap();
    c.bench_function("smooth_256", |b| {
        b.iter(|| {
            terrain.smooth();
            black_box(terrain.height());
        });
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let terrain = reference_profile(3).unwrap();
    let mut bytes = Vec::new();
    encode(&mut bytes, &terrain).unwrap();

    c.bench_function("snapshot_encode_256", |b| {
        let mut buf = Vec::with_capacity(bytes.len());
        b.iter(|| {
            buf.clear();
            encode(&mut buf, &terrain).unwrap();
            black_box(&buf);
        });
    });
    c.bench_function("snapshot_decode_256", |b| {
        b.iter(|| black_box(decode(&mut &bytes[..]).unwrap()));
    });
    c.bench_function("terrain_hash_256", |b| {
        b.iter(|| black_box(terrain_hash(&terrain)));
    });
}

criterion_group!(benches, bench_generate, bench_smooth, bench_snapshot);
criterion_main!(benches);
