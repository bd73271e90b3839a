// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quarry AABB: a dynamic bounding volume hierarchy for level editors.
//!
//! [`AabbTree`] stores user data (brushes, entities, faces) together with an
//! axis-aligned box and answers "what might the pick ray hit?" and "what
//! contains this point?" without scanning every object.
//!
//! - Insert, remove and update data one at a time as the map is edited.
//! - Query lazily with [`AabbTree::find_intersectors`] and [`AabbTree::find_containers`].
//! - Walk the hierarchy with a [`Visitor`] or a pair of closures.
//! - Print the whole hierarchy with `Display` for debugging.
//!
//! The tree is generic over the scalar `T` (`f32` or `f64`), the dimension `S`
//! and the data type `U`. Data values are keys: each may appear at most once,
//! and removal and update look the leaf up by value.
//!
//! # Example
//!
//! ```rust
//! use quarry_aabb::{AabbTree3, Bounds, Ray};
//!
//! let mut tree: AabbTree3<&str> = AabbTree3::new();
//! tree.insert(Bounds::new([0.0, 0.0, 0.0], [64.0, 64.0, 16.0]), "floor").unwrap();
//! tree.insert(Bounds::new([0.0, 0.0, 16.0], [16.0, 64.0, 128.0]), "wall").unwrap();
//!
//! // Cast a ray down from above the floor.
//! let ray = Ray::new([32.0, 32.0, 200.0], [0.0, 0.0, -1.0]);
//! let hits: Vec<_> = tree.find_intersectors(&ray).collect();
//! assert_eq!(hits, vec![&"floor"]);
//!
//! // Move the wall and query by point.
//! tree.update(Bounds::new([48.0, 0.0, 16.0], [64.0, 64.0, 128.0]), "wall").unwrap();
//! assert_eq!(tree.find_containers(&[56.0, 8.0, 20.0]).count(), 1);
//! assert!(tree.remove(&"wall"));
//! assert_eq!(tree.len(), 1);
//! ```
//!
//! ## Insertion heuristic
//!
//! A new box descends into the child that already contains it, otherwise the
//! child whose volume grows the least. Remaining ties go to the shallower
//! child, then to [`TreeConfig::tie_break`]. There are no rotations, so the
//! shape depends on insertion order; [`AabbTree::clear_and_build`] is the way to
//! start over from a known set.
//!
//! ### Float semantics
//!
//! Bounds with a NaN component are rejected with [`TreeError::InvalidBounds`].
//! Containment tests are inclusive on every face.
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to `thiserror` and, with `kurbo`, to Kurbo.
//! - `libm`: no_std math for Kurbo when `kurbo` is enabled without `std`.
//! - `kurbo`: conversions between `kurbo` 2D types and `Bounds<f64, 2>` / `Ray<f64, 2>`.
//!
//! This crate is `no_std` and uses `alloc`; the data index is a `hashbrown` map.

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
#[cfg(feature = "kurbo")]
pub mod interop;
mod node;
pub mod tree;
pub mod types;
pub mod visit;

pub use config::{TieBreak, TreeConfig};
pub use error::{TreeError, TreeResult};
pub use tree::{AabbTree, AabbTree2, AabbTree3};
pub use types::{Bounds, Ray, Scalar, intersect_ray_bounds};
pub use visit::{Query, Visitor};
