// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quarry_aabb::{AabbTree2, Bounds};

use rstar::RTree;
use rstar::primitives::Rectangle;

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Bounds<f64, 2>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Bounds::new([x0, y0], [x0 + cell, y0 + cell]));
        }
    }
    out
}

fn to_rstar_rects(v: &[Bounds<f64, 2>]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|b| Rectangle::from_corners(b.min, b.max))
        .collect()
}

fn probe_points(n: usize, cell: f64) -> Vec<[f64; 2]> {
    (0..n)
        .map(|i| {
            let t = i as f64 + 0.5;
            [t * cell, (n as f64 - t) * cell]
        })
        .collect()
}

fn bench_point_query_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_query_compare_f64");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let points = probe_points(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("quarry_build_query_n{}", n), |b| {
            b.iter_batched(
                AabbTree2::<u32>::new,
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = tree.insert(r, i as u32);
                    }
                    let hits: usize = points.iter().map(|p| tree.find_containers(p).count()).sum();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let hits: usize = points
                        .iter()
                        .map(|p| tree.locate_all_at_point(p).count())
                        .sum();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_point_query_compare);
criterion_main!(benches);
