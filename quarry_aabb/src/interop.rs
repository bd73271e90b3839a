// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversions to and from [`kurbo`] for 2D trees.
//!
//! An orthographic map view works in `kurbo` coordinates; these conversions
//! let it feed an [`AabbTree2`] and query it without unpacking components.
//!
//! ```rust
//! use kurbo::{Line, Point, Rect};
//! use quarry_aabb::{AabbTree2, Bounds, Ray};
//!
//! let mut tree: AabbTree2<u32> = AabbTree2::new();
//! tree.insert(Rect::new(0.0, 0.0, 32.0, 8.0).into(), 7).unwrap();
//!
//! let click = Point::new(4.0, 4.0);
//! assert_eq!(tree.find_containers_at(click).count(), 1);
//!
//! let ray: Ray<f64, 2> = Line::new((-10.0, 4.0), (0.0, 4.0)).into();
//! assert_eq!(tree.find_intersectors(&ray).next(), Some(&7));
//! ```

use core::hash::Hash;

use kurbo::{Line, Point, Rect};

use crate::tree::AabbTree2;
use crate::types::{Bounds, Ray};

impl From<Rect> for Bounds<f64, 2> {
    /// Normalizes the rectangle first, so `x0 > x1` is accepted.
    fn from(r: Rect) -> Self {
        let r = r.abs();
        Self::new([r.x0, r.y0], [r.x1, r.y1])
    }
}

impl From<Bounds<f64, 2>> for Rect {
    fn from(b: Bounds<f64, 2>) -> Self {
        Self::new(b.min[0], b.min[1], b.max[0], b.max[1])
    }
}

impl From<Line> for Ray<f64, 2> {
    /// Origin at `p0`, pointing through `p1`.
    fn from(l: Line) -> Self {
        let d = l.p1 - l.p0;
        Self::new(point(l.p0), [d.x, d.y])
    }
}

/// A `kurbo` point as a query point.
pub fn point(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

impl<U: Clone + Hash + Eq> AabbTree2<U> {
    /// [`find_containers`](crate::AabbTree::find_containers) for a `kurbo` point.
    pub fn find_containers_at(&self, p: Point) -> impl Iterator<Item = &U> + '_ {
        self.find_containers(&point(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn rect_round_trip_normalizes() {
        let b: Bounds<f64, 2> = Rect::new(4.0, 3.0, 1.0, -2.0).into();
        assert_eq!(b, Bounds::new([1.0, -2.0], [4.0, 3.0]));
        assert_eq!(Rect::from(b), Rect::new(1.0, -2.0, 4.0, 3.0));
    }

    #[test]
    fn line_becomes_ray_through_p1() {
        let ray: Ray<f64, 2> = Line::new((1.0, 1.0), (3.0, 2.0)).into();
        assert_eq!(ray.origin, [1.0, 1.0]);
        assert_eq!(ray.direction, [2.0, 1.0]);
        assert_eq!(ray.point_at(1.0), [3.0, 2.0]);
    }

    #[test]
    fn viewport_queries() {
        let mut tree: AabbTree2<&str> = AabbTree2::new();
        tree.insert(Rect::new(0.0, 0.0, 10.0, 10.0).into(), "crate")
            .unwrap();
        tree.insert(Rect::new(20.0, 0.0, 30.0, 10.0).into(), "barrel")
            .unwrap();

        assert_eq!(
            tree.find_containers_at(Point::new(25.0, 5.0)).collect::<Vec<_>>(),
            vec![&"barrel"]
        );
        assert_eq!(tree.find_containers_at(Point::new(15.0, 5.0)).count(), 0);
        let covered: Rect = (*tree.bounds().unwrap()).into();
        assert_eq!(covered, Rect::new(0.0, 0.0, 30.0, 10.0));
    }
}
