// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quarry_aabb::{AabbTree3, Bounds, Ray};

type B3 = Bounds<f64, 3>;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A flat room of `n * n` floor tiles, each `cell` units wide and 16 units high.
fn gen_floor_tiles(n: usize, cell: f64) -> Vec<B3> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Bounds::new([x0, y0, 0.0], [x0 + cell, y0 + cell, 16.0]));
        }
    }
    out
}

/// Brushes of random size scattered through a `world`-sized cube.
fn gen_scattered_brushes(count: usize, world: f64, max_size: f64) -> Vec<B3> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let min: [f64; 3] = core::array::from_fn(|_| rng.next_f64() * (world - max_size));
            let max = core::array::from_fn(|i| min[i] + 1.0 + rng.next_f64() * max_size);
            Bounds::new(min, max)
        })
        .collect()
}

/// Rays shot downwards from above the scene at random positions.
fn gen_pick_rays(count: usize, world: f64) -> Vec<Ray<f64, 3>> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| {
            let origin = [rng.next_f64() * world, rng.next_f64() * world, world * 2.0];
            Ray::new(origin, [0.0, 0.0, -1.0])
        })
        .collect()
}

fn build(boxes: &[B3]) -> AabbTree3<u32> {
    let mut tree = AabbTree3::with_capacity(boxes.len());
    for (i, b) in boxes.iter().enumerate() {
        tree.insert(*b, i as u32).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[32usize, 64, 128] {
        let tiles = gen_floor_tiles(n, 16.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("floor_tiles_n{}", n), |b| {
            b.iter_batched(
                AabbTree3::<u32>::new,
                |mut tree| {
                    for (i, r) in tiles.iter().copied().enumerate() {
                        let _ = tree.insert(r, i as u32);
                    }
                    black_box(tree.height());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let brushes = gen_scattered_brushes(4096, 4096.0, 128.0);
    group.throughput(Throughput::Elements(brushes.len() as u64));
    group.bench_function("scattered_brushes_clear_and_build", |b| {
        b.iter_batched(
            AabbTree3::<u32>::new,
            |mut tree| {
                tree.clear_and_build(0..brushes.len() as u32, |&i| brushes[i as usize])
                    .unwrap();
                black_box(tree.height());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    let brushes = gen_scattered_brushes(4096, 4096.0, 128.0);
    let tree = build(&brushes);
    let moves = 256_u32;
    group.throughput(Throughput::Elements(u64::from(moves)));
    group.bench_function("nudge_256_brushes", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                for i in 0..moves {
                    let mut moved = brushes[i as usize];
                    moved.min[0] += 8.0;
                    moved.max[0] += 8.0;
                    tree.update(moved, i).unwrap();
                }
                black_box(tree.height());
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let brushes = gen_scattered_brushes(4096, 4096.0, 128.0);
    let tree = build(&brushes);
    let rays = gen_pick_rays(256, 4096.0);
    group.throughput(Throughput::Elements(rays.len() as u64));
    group.bench_function("find_intersectors_scattered", |b| {
        b.iter(|| {
            let hits: usize = rays.iter().map(|r| tree.find_intersectors(r).count()).sum();
            black_box(hits);
        })
    });
    group.bench_function("find_first_intersector_scattered", |b| {
        b.iter(|| {
            let hits = rays
                .iter()
                .filter(|r| tree.find_intersectors(r).next().is_some())
                .count();
            black_box(hits);
        })
    });
    group.bench_function("find_containers_scattered", |b| {
        b.iter(|| {
            let hits: usize = rays
                .iter()
                .map(|r| {
                    let p = [r.origin[0], r.origin[1], 64.0];
                    tree.find_containers(&p).count()
                })
                .sum();
            black_box(hits);
        })
    });

    let tiles = build(&gen_floor_tiles(128, 16.0));
    group.bench_function("find_intersectors_floor_n128", |b| {
        b.iter(|| {
            let hits: usize = rays
                .iter()
                .map(|r| {
                    let r = Ray::new([r.origin[0] / 2.0, r.origin[1] / 2.0, 64.0], r.direction);
                    tiles.find_intersectors(&r).count()
                })
                .sum();
            black_box(hits);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_update, bench_queries);
criterion_main!(benches);
