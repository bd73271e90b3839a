// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry consumed by the tree: scalars, S-dimensional bounds and rays.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display};
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Floating-point scalar abstraction for bounds and rays.
///
/// The tree only needs ordering, the four basic operations and a NaN test, so
/// this is implemented for `f32` and `f64`.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// One value for the scalar type.
    fn one() -> Self;

    /// Whether the value is NaN.
    fn is_nan(self) -> bool;
}

impl Scalar for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn is_nan(self) -> bool {
        Self::is_nan(self)
    }
}

impl Scalar for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn is_nan(self) -> bool {
        Self::is_nan(self)
    }
}

/// Axis-aligned bounding box in `S` dimensions.
///
/// `min <= max` is expected component-wise. Boxes used as tree keys must not
/// contain NaN; [`AabbTree::insert`](crate::AabbTree::insert) rejects them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds<T, const S: usize> {
    /// Minimum corner.
    pub min: [T; S],
    /// Maximum corner.
    pub max: [T; S],
}

impl<T, const S: usize> Bounds<T, S> {
    /// Create new bounds from min/max corners.
    pub const fn new(min: [T; S], max: [T; S]) -> Self {
        Self { min, max }
    }
}

impl<T: Scalar, const S: usize> Bounds<T, S> {
    /// Smallest bounds containing both `self` and `other`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: core::array::from_fn(|i| min_t(self.min[i], other.min[i])),
            max: core::array::from_fn(|i| max_t(self.max[i], other.max[i])),
        }
    }

    /// Product of the extents along every axis.
    pub fn volume(&self) -> T {
        (0..S).fold(T::one(), |acc, i| acc * (self.max[i] - self.min[i]))
    }

    /// Whether `other` lies entirely within these bounds (faces inclusive).
    pub fn contains(&self, other: &Self) -> bool {
        (0..S).all(|i| le(self.min[i], other.min[i]) && le(other.max[i], self.max[i]))
    }

    /// Whether the point lies within these bounds (faces inclusive).
    pub fn contains_point(&self, point: &[T; S]) -> bool {
        (0..S).all(|i| le(self.min[i], point[i]) && le(point[i], self.max[i]))
    }

    /// Whether any component of either corner is NaN.
    pub fn is_nan(&self) -> bool {
        self.min.iter().chain(self.max.iter()).any(|v| v.is_nan())
    }

    /// Center point.
    pub fn center(&self) -> [T; S] {
        let two = T::one() + T::one();
        core::array::from_fn(|i| (self.min[i] + self.max[i]) / two)
    }

    /// Extent along every axis.
    pub fn size(&self) -> [T; S] {
        core::array::from_fn(|i| self.max[i] - self.min[i])
    }
}

impl<T: Display, const S: usize> Display for Bounds<T, S> {
    /// Formats as `[ ( min... ) ( max... ) ]`, the layout of the tree dump.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[ ")?;
        write_point(f, &self.min)?;
        f.write_str(" ")?;
        write_point(f, &self.max)?;
        f.write_str(" ]")
    }
}

fn write_point<T: Display, const S: usize>(
    f: &mut fmt::Formatter<'_>,
    point: &[T; S],
) -> fmt::Result {
    f.write_str("(")?;
    for v in point {
        write!(f, " {v}")?;
    }
    f.write_str(" )")
}

/// A ray with an origin and a (not necessarily normalized) direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray<T, const S: usize> {
    /// Start point.
    pub origin: [T; S],
    /// Direction.
    pub direction: [T; S],
}

impl<T, const S: usize> Ray<T, S> {
    /// Create a new ray.
    pub const fn new(origin: [T; S], direction: [T; S]) -> Self {
        Self { origin, direction }
    }
}

impl<T: Scalar, const S: usize> Ray<T, S> {
    /// Point at parameter `t`: `origin + t * direction`.
    pub fn point_at(&self, t: T) -> [T; S] {
        core::array::from_fn(|i| self.origin[i] + t * self.direction[i])
    }
}

/// Distance along `ray` at which it hits `bounds`, or `None` if it misses.
///
/// For an origin outside the box this is the entry distance. For an origin
/// inside the box on every axis it is the distance to the nearest exit face.
/// Distances are in units of the ray direction's length.
pub fn intersect_ray_bounds<T: Scalar, const S: usize>(
    ray: &Ray<T, S>,
    bounds: &Bounds<T, S>,
) -> Option<T> {
    if S == 0 {
        return None;
    }

    // Candidate plane per axis, and whether the origin is within that slab.
    let mut planes = [T::zero(); S];
    let mut inside = [false; S];
    let mut all_inside = true;
    for i in 0..S {
        if lt(ray.origin[i], bounds.min[i]) {
            planes[i] = bounds.min[i];
            all_inside = false;
        } else if lt(bounds.max[i], ray.origin[i]) {
            planes[i] = bounds.max[i];
            all_inside = false;
        } else {
            planes[i] = if lt(ray.direction[i], T::zero()) {
                bounds.min[i]
            } else {
                bounds.max[i]
            };
            inside[i] = true;
        }
    }

    let distances: [T; S] = core::array::from_fn(|i| {
        if ray.direction[i] == T::zero() {
            -T::one()
        } else {
            (planes[i] - ray.origin[i]) / ray.direction[i]
        }
    });

    let best = if all_inside {
        // Nearest exit plane; the ray never leaves a slab it runs parallel to.
        let mut exits = (0..S).filter(|&i| ray.direction[i] != T::zero());
        let first = exits.next()?;
        exits.fold(first, |best, i| {
            if lt(distances[i], distances[best]) {
                i
            } else {
                best
            }
        })
    } else {
        // Farthest entry plane among the slabs the origin is outside of.
        let first = (0..S).find(|&i| !inside[i]).unwrap_or(0);
        (first + 1..S).fold(first, |best, i| {
            if !inside[i] && lt(distances[best], distances[i]) {
                i
            } else {
                best
            }
        })
    };

    let distance = distances[best];
    if !le(T::zero(), distance) {
        return None;
    }
    for i in (0..S).filter(|&i| i != best) {
        let coord = ray.origin[i] + distance * ray.direction[i];
        if lt(coord, bounds.min[i]) || lt(bounds.max[i], coord) {
            return None;
        }
    }
    Some(distance)
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
