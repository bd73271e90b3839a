// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pruned pre-order traversal: the [`Visitor`] trait and the lazy query
//! iterator behind [`AabbTree::find_intersectors`](crate::AabbTree::find_intersectors)
//! and [`AabbTree::find_containers`](crate::AabbTree::find_containers).

use alloc::vec;
use alloc::vec::Vec;

use crate::node::{Arena, Kind, NodeIdx};
use crate::types::Bounds;

/// Double-dispatch over the two node kinds during a traversal.
///
/// Nodes are visited in pre-order, left child before right child.
pub trait Visitor<T, const S: usize, U> {
    /// Called for an inner node. Return `true` to descend into its children,
    /// `false` to skip the whole subtree.
    fn visit_inner(&mut self, bounds: &Bounds<T, S>, height: usize) -> bool;

    /// Called for a leaf reached through accepted inner nodes.
    fn visit_leaf(&mut self, bounds: &Bounds<T, S>, data: &U);
}

/// A visitor built from two closures.
pub(crate) struct FnVisitor<I, L> {
    pub(crate) inner: I,
    pub(crate) leaf: L,
}

impl<T, const S: usize, U, I, L> Visitor<T, S, U> for FnVisitor<I, L>
where
    I: FnMut(&Bounds<T, S>, usize) -> bool,
    L: FnMut(&Bounds<T, S>, &U),
{
    fn visit_inner(&mut self, bounds: &Bounds<T, S>, height: usize) -> bool {
        (self.inner)(bounds, height)
    }

    fn visit_leaf(&mut self, bounds: &Bounds<T, S>, data: &U) {
        (self.leaf)(bounds, data);
    }
}

/// Drive `visitor` over the subtree rooted at `root`.
pub(crate) fn walk<T, const S: usize, U, V>(arena: &Arena<T, S, U>, root: NodeIdx, visitor: &mut V)
where
    V: Visitor<T, S, U> + ?Sized,
{
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        let node = arena.get(idx);
        match &node.kind {
            Kind::Leaf(data) => visitor.visit_leaf(&node.bounds, data),
            Kind::Inner {
                left,
                right,
                height,
            } => {
                if visitor.visit_inner(&node.bounds, *height) {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
    }
}

/// Lazy pre-order iterator over the leaves whose bounds, and whose
/// ancestors' bounds, satisfy a predicate.
///
/// Nothing is computed until the iterator is polled, so dropping it stops the
/// traversal. The order follows the current tree shape and is not stable
/// across mutations.
pub struct Query<'a, T, const S: usize, U, P> {
    arena: &'a Arena<T, S, U>,
    stack: Vec<NodeIdx>,
    accept: P,
}

impl<'a, T, const S: usize, U, P> Query<'a, T, S, U, P> {
    pub(crate) fn new(arena: &'a Arena<T, S, U>, root: Option<NodeIdx>, accept: P) -> Self {
        Self {
            arena,
            stack: root.into_iter().collect(),
            accept,
        }
    }
}

impl<'a, T, const S: usize, U, P> Iterator for Query<'a, T, S, U, P>
where
    P: FnMut(&Bounds<T, S>) -> bool,
{
    type Item = (&'a Bounds<T, S>, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        while let Some(idx) = self.stack.pop() {
            let node = arena.get(idx);
            if !(self.accept)(&node.bounds) {
                continue;
            }
            match &node.kind {
                Kind::Leaf(data) => return Some((&node.bounds, data)),
                Kind::Inner { left, right, .. } => {
                    self.stack.push(*right);
                    self.stack.push(*left);
                }
            }
        }
        None
    }
}

impl<T, const S: usize, U, P> core::fmt::Debug for Query<'_, T, S, U, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Query")
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}
