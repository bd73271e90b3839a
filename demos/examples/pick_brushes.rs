// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking brushes in a 3D viewport.
//!
//! Build a tree of brushes, cast a pick ray, move a brush, and dump the tree.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p quarry_demos --example pick_brushes`

use quarry_aabb::{AabbTree3, Bounds, Ray, intersect_ray_bounds};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct BrushId(u32);

impl core::fmt::Display for BrushId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "brush#{}", self.0)
    }
}

fn main() {
    env_logger::init();

    let brushes = [
        (BrushId(1), Bounds::new([0.0, 0.0, 0.0], [256.0, 256.0, 16.0])),
        (BrushId(2), Bounds::new([0.0, 0.0, 16.0], [16.0, 256.0, 128.0])),
        (BrushId(3), Bounds::new([240.0, 0.0, 16.0], [256.0, 256.0, 128.0])),
        (BrushId(4), Bounds::new([96.0, 96.0, 16.0], [160.0, 160.0, 48.0])),
    ];

    let mut tree = AabbTree3::new();
    tree.clear_and_build(brushes.iter().map(|(id, _)| *id), |id| {
        brushes[id.0 as usize - 1].1
    })
    .expect("brush bounds are finite and ids unique");
    print!("{tree}");

    // Looking straight down through the crate in the middle of the room.
    let ray = Ray::new([128.0, 128.0, 512.0], [0.0, 0.0, -1.0]);
    let mut hits: Vec<_> = tree
        .find_intersectors(&ray)
        .filter_map(|id| {
            let bounds = tree.bounds_of(id)?;
            intersect_ray_bounds(&ray, bounds).map(|t| (t, *id))
        })
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (t, id) in &hits {
        println!("{id} at distance {t}");
    }
    assert_eq!(hits.first().map(|h| h.1), Some(BrushId(4)), "crate is nearest");

    // Drag the crate into the corner; the pick now reaches the floor first.
    tree.update(Bounds::new([16.0, 16.0, 16.0], [80.0, 80.0, 48.0]), BrushId(4))
        .expect("brush 4 is in the tree");
    let first = tree.find_intersectors(&ray).next();
    println!("after move: {first:?}");
    assert_eq!(first, Some(&BrushId(1)), "only the floor is under the ray");

    let inside = tree.find_containers(&[8.0, 100.0, 64.0]).count();
    println!("brushes containing the wall point: {inside}");
    assert_eq!(inside, 1, "the point lies only inside the left wall");
    print!("{tree}");
}
