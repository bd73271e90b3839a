// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-down map view.
//!
//! Index entity footprints as `kurbo` rectangles, then hit-test a click and a
//! drag line.
//!
//! Run:
//! - `cargo run -p quarry_demos --example viewport_2d`

use kurbo::{Line, Point, Rect};
use quarry_aabb::{AabbTree2, Ray, TieBreak, TreeConfig};

fn main() {
    env_logger::init();

    let mut tree = AabbTree2::with_config(TreeConfig {
        tie_break: TieBreak::PreferLeft,
    });
    let entities = [
        ("info_player_start", Rect::new(32.0, 32.0, 64.0, 64.0)),
        ("light", Rect::new(120.0, 40.0, 136.0, 56.0)),
        ("item_health", Rect::new(200.0, 200.0, 232.0, 232.0)),
    ];
    for (name, rect) in entities {
        if let Err(err) = tree.insert(rect.into(), name) {
            log::warn!("skipping {name}: {err}");
        }
    }

    let click = Point::new(40.0, 50.0);
    let picked: Vec<_> = tree.find_containers_at(click).collect();
    println!("click at {click:?} picked {picked:?}");
    assert_eq!(picked, vec![&"info_player_start"], "click lands on the player start");

    let drag: Ray<f64, 2> = Line::new((0.0, 48.0), (10.0, 48.0)).into();
    let mut crossed: Vec<_> = tree.find_intersectors(&drag).copied().collect();
    crossed.sort_unstable();
    println!("drag line crosses {crossed:?}");
    assert_eq!(crossed, ["info_player_start", "light"], "drag crosses two entities");

    if let Some(bounds) = tree.bounds() {
        println!("map extent: {:?}", Rect::from(*bounds));
    }
}
