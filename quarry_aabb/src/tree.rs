// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The public [`AabbTree`]: data index, mutations and queries.

use alloc::vec;
use core::borrow::Borrow;
use core::fmt::{self, Debug, Display};
use core::hash::Hash;

use hashbrown::HashMap;
use log::{debug, trace};

use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::node::{Arena, Kind, NodeIdx, TieState};
use crate::types::{Bounds, Ray, Scalar, intersect_ray_bounds};
use crate::visit::{FnVisitor, Query, Visitor, walk};

/// A dynamic axis-aligned bounding box tree.
///
/// Each datum `U` is stored in exactly one leaf together with its bounds.
/// Inner nodes have exactly two children and cache the merged bounds and the
/// height of their subtree. Data values are unique keys: a side table maps
/// every datum to its leaf, so membership tests and removal are O(1) lookups
/// followed by an O(height) fix-up.
///
/// The tree is not rebalanced by rotations; insertion descends into the child
/// whose volume grows the least, preferring the shallower child on ties.
#[derive(Clone)]
pub struct AabbTree<T, const S: usize, U> {
    arena: Arena<T, S, U>,
    root: Option<NodeIdx>,
    leaves: HashMap<U, NodeIdx>,
    ties: TieState,
    config: TreeConfig,
}

/// Tree over `f64` in three dimensions, the common case for map geometry.
pub type AabbTree3<U> = AabbTree<f64, 3, U>;

/// Tree over `f64` in two dimensions, for orthographic views.
pub type AabbTree2<U> = AabbTree<f64, 2, U>;

impl<T, const S: usize, U> Default for AabbTree<T, S, U> {
    fn default() -> Self {
        Self::with_config(TreeConfig::default())
    }
}

impl<T, const S: usize, U> AabbTree<T, S, U> {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree with the given configuration.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            arena: Arena::default(),
            root: None,
            leaves: HashMap::new(),
            ties: TieState::new(config.tie_break),
            config,
        }
    }

    /// The configuration this tree was created with.
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Whether the tree holds no data.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of data items (leaves) in the tree.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Bounds of everything in the tree, or `None` when empty.
    pub fn bounds(&self) -> Option<&Bounds<T, S>> {
        self.root.map(|root| &self.arena.get(root).bounds)
    }

    /// Height of the tree: 0 when empty, 1 for a single leaf.
    pub fn height(&self) -> usize {
        self.root.map_or(0, |root| self.arena.get(root).height())
    }

    /// Remove every node and every index entry.
    pub fn clear(&mut self) {
        debug!(
            "clearing AABB tree with {} leaves ({} nodes)",
            self.leaves.len(),
            self.arena.live()
        );
        self.arena.clear();
        self.leaves.clear();
        self.root = None;
        self.ties.reset();
    }

    /// Walk the tree in pre-order with `visitor`.
    pub fn accept<V: Visitor<T, S, U> + ?Sized>(&self, visitor: &mut V) {
        if let Some(root) = self.root {
            walk(&self.arena, root, visitor);
        }
    }

    /// Walk the tree with a pair of closures.
    ///
    /// `inner` receives an inner node's bounds and height and decides whether
    /// to descend; `leaf` receives every leaf that was reached.
    pub fn visit<I, L>(&self, inner: I, leaf: L)
    where
        I: FnMut(&Bounds<T, S>, usize) -> bool,
        L: FnMut(&Bounds<T, S>, &U),
    {
        self.accept(&mut FnVisitor { inner, leaf });
    }

    /// Every leaf's bounds and data, in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (&Bounds<T, S>, &U)> + '_ {
        Query::new(&self.arena, self.root, |_: &Bounds<T, S>| true)
    }

    /// Panic if any structural invariant is violated.
    ///
    /// Checks parent links, cached heights and bounds of every inner node, and
    /// that the data index maps exactly the leaves present. This walks the
    /// whole tree and is meant for tests and debugging.
    ///
    /// # Panics
    ///
    /// On the first violated invariant, with a message naming it.
    pub fn check_invariants(&self)
    where
        T: Scalar,
        U: Hash + Eq,
    {
        let Some(root) = self.root else {
            assert!(self.leaves.is_empty(), "empty tree must have an empty index");
            return;
        };
        assert_eq!(self.arena.get(root).parent, None, "root must not have a parent");

        let mut leaf_count = 0_usize;
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let node = self.arena.get(idx);
            match &node.kind {
                Kind::Leaf(data) => {
                    leaf_count += 1;
                    assert_eq!(
                        self.leaves.get(data),
                        Some(&idx),
                        "index must map leaf data to its leaf"
                    );
                }
                Kind::Inner {
                    left,
                    right,
                    height,
                } => {
                    let (l, r) = (self.arena.get(*left), self.arena.get(*right));
                    assert_eq!(l.parent, Some(idx), "left child must point at its parent");
                    assert_eq!(r.parent, Some(idx), "right child must point at its parent");
                    assert_eq!(
                        *height,
                        1 + l.height().max(r.height()),
                        "inner height must be one more than its tallest child"
                    );
                    assert_eq!(
                        node.bounds,
                        l.bounds.merge(&r.bounds),
                        "inner bounds must be the merge of its children"
                    );
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
        assert_eq!(leaf_count, self.leaves.len(), "index must have one entry per leaf");
        assert_eq!(
            self.arena.live(),
            2 * leaf_count - 1,
            "a binary tree with n leaves has 2n - 1 nodes"
        );
    }
}

impl<T, const S: usize, U> AabbTree<T, S, U>
where
    T: Scalar,
    U: Clone + Hash + Eq,
{
    /// Create an empty tree with room for `n` data items.
    pub fn with_capacity(n: usize) -> Self {
        let mut tree = Self::new();
        tree.reserve(n);
        tree
    }

    /// Reserve space for at least `n` more data items.
    pub fn reserve(&mut self, n: usize) {
        // n leaves plus up to n inner nodes.
        self.arena.reserve(n.saturating_mul(2));
        self.leaves.reserve(n);
    }

    /// Whether a leaf holds `data`.
    pub fn contains<Q>(&self, data: &Q) -> bool
    where
        U: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.leaves.contains_key(data)
    }

    /// The bounds stored with `data`, if present.
    pub fn bounds_of<Q>(&self, data: &Q) -> Option<&Bounds<T, S>>
    where
        U: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.leaves.get(data).map(|&leaf| &self.arena.get(leaf).bounds)
    }

    /// Insert `data` with the given bounds.
    ///
    /// # Errors
    ///
    /// - [`TreeError::InvalidBounds`] if `bounds` has a NaN component.
    /// - [`TreeError::DuplicateKey`] if `data` is already in the tree.
    ///
    /// The tree is unchanged on error.
    pub fn insert(&mut self, bounds: Bounds<T, S>, data: U) -> TreeResult<()> {
        check(&bounds)?;
        if self.leaves.contains_key(&data) {
            return Err(TreeError::DuplicateKey);
        }
        self.insert_unchecked(bounds, data);
        Ok(())
    }

    fn insert_unchecked(&mut self, bounds: Bounds<T, S>, data: U) {
        let key = data.clone();
        let leaf = match self.root {
            None => {
                let leaf = self.arena.alloc_leaf(bounds, data);
                self.root = Some(leaf);
                leaf
            }
            Some(root) => {
                let (new_root, leaf) = self.arena.insert(root, bounds, data, &mut self.ties);
                self.root = Some(new_root);
                leaf
            }
        };
        trace!(
            "inserted leaf {leaf:?} with bounds {bounds}, tree height {}",
            self.height()
        );
        let previous = self.leaves.insert(key, leaf);
        debug_assert!(previous.is_none(), "data was indexed twice");
    }

    /// Remove the leaf holding `data`.
    ///
    /// Returns `false` if no leaf holds `data`, so removal is idempotent.
    pub fn remove<Q>(&mut self, data: &Q) -> bool
    where
        U: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(leaf) = self.leaves.remove(data) else {
            return false;
        };
        self.root = self.arena.delete_leaf(leaf);
        trace!("removed leaf {leaf:?}, tree height {}", self.height());
        true
    }

    /// Move `data` to `bounds` by removing and re-inserting it.
    ///
    /// # Errors
    ///
    /// - [`TreeError::InvalidBounds`] if `bounds` has a NaN component.
    /// - [`TreeError::NotFound`] if `data` is not in the tree.
    ///
    /// The tree is unchanged on error.
    pub fn update(&mut self, bounds: Bounds<T, S>, data: U) -> TreeResult<()> {
        check(&bounds)?;
        if !self.remove(&data) {
            return Err(TreeError::NotFound);
        }
        self.insert_unchecked(bounds, data);
        Ok(())
    }

    /// Clear the tree and insert every object with bounds from `get_bounds`.
    ///
    /// # Errors
    ///
    /// Stops at the first object that [`insert`](Self::insert) rejects and
    /// returns that error; objects before it remain in the tree.
    pub fn clear_and_build<I, F>(&mut self, objects: I, mut get_bounds: F) -> TreeResult<()>
    where
        I: IntoIterator<Item = U>,
        F: FnMut(&U) -> Bounds<T, S>,
    {
        self.clear();
        let objects = objects.into_iter();
        self.reserve(objects.size_hint().0);
        for object in objects {
            let bounds = get_bounds(&object);
            self.insert(bounds, object)?;
        }
        debug!(
            "built AABB tree with {} leaves, height {}",
            self.len(),
            self.height()
        );
        Ok(())
    }

    /// Data whose bounds contain the ray origin or are hit by the ray.
    ///
    /// Subtrees whose bounds fail the same test are skipped. The iterator is
    /// lazy; its order depends on the current tree shape.
    pub fn find_intersectors(
        &self,
        ray: &Ray<T, S>,
    ) -> impl Iterator<Item = &U> + use<'_, T, S, U> {
        let ray = *ray;
        Query::new(&self.arena, self.root, move |bounds: &Bounds<T, S>| {
            bounds.contains_point(&ray.origin) || intersect_ray_bounds(&ray, bounds).is_some()
        })
        .map(|(_, data)| data)
    }

    /// Data whose bounds contain `point` (faces inclusive).
    pub fn find_containers(&self, point: &[T; S]) -> impl Iterator<Item = &U> + use<'_, T, S, U> {
        let point = *point;
        Query::new(&self.arena, self.root, move |bounds: &Bounds<T, S>| {
            bounds.contains_point(&point)
        })
        .map(|(_, data)| data)
    }
}

fn check<T: Scalar, const S: usize>(bounds: &Bounds<T, S>) -> TreeResult<()> {
    if bounds.is_nan() {
        return Err(TreeError::InvalidBounds);
    }
    Ok(())
}

impl<T: Display, const S: usize, U: Display> Display for AabbTree<T, S, U> {
    /// Pre-order dump, one node per line, two spaces of indent per level.
    ///
    /// Inner nodes print as `O [ ( min ) ( max ) ]`, leaves as
    /// `L [ ( min ) ( max ) ]: data`. An empty tree prints nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return Ok(());
        };
        let mut stack = vec![(root, 0_usize)];
        while let Some((idx, level)) = stack.pop() {
            let node = self.arena.get(idx);
            for _ in 0..level {
                f.write_str("  ")?;
            }
            match &node.kind {
                Kind::Leaf(data) => writeln!(f, "L {}: {data}", node.bounds)?,
                Kind::Inner { left, right, .. } => {
                    writeln!(f, "O {}", node.bounds)?;
                    stack.push((*right, level + 1));
                    stack.push((*left, level + 1));
                }
            }
        }
        Ok(())
    }
}

impl<T, const S: usize, U> Debug for AabbTree<T, S, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AabbTree")
            .field("leaves", &self.leaves.len())
            .field("nodes", &self.arena.live())
            .field("has_root", &self.root.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
