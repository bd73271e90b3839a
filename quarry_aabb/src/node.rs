// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node arena and the structural algorithms: insertion descent and leaf
//! removal with sibling promotion.
//!
//! Both walk the tree with loops; a chain of nested boxes can make the height
//! equal to the number of leaves.
//!
//! An inner node owns its two child indices and the tree owns the root index.
//! `parent` is a lookup used to walk upwards after a mutation; freeing a slot
//! never follows it and never cascades into children.

use alloc::vec::Vec;

use crate::config::TieBreak;
use crate::types::{Bounds, Scalar};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Kind<U> {
    Leaf(U),
    Inner {
        left: NodeIdx,
        right: NodeIdx,
        height: usize,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T, const S: usize, U> {
    pub(crate) bounds: Bounds<T, S>,
    pub(crate) parent: Option<NodeIdx>,
    pub(crate) kind: Kind<U>,
}

impl<T, const S: usize, U> Node<T, S, U> {
    fn leaf(bounds: Bounds<T, S>, data: U) -> Self {
        Self {
            bounds,
            parent: None,
            kind: Kind::Leaf(data),
        }
    }

    /// Leaves have height 1; inner nodes cache theirs.
    pub(crate) fn height(&self) -> usize {
        match self.kind {
            Kind::Leaf(_) => 1,
            Kind::Inner { height, .. } => height,
        }
    }
}

/// Per-tree tie-break state.
#[derive(Clone, Debug)]
pub(crate) struct TieState {
    policy: TieBreak,
    ties: usize,
}

impl TieState {
    pub(crate) const fn new(policy: TieBreak) -> Self {
        Self { policy, ties: 0 }
    }

    pub(crate) fn reset(&mut self) {
        self.ties = 0;
    }

    fn pick_left(&mut self) -> bool {
        match self.policy {
            TieBreak::PreferLeft => true,
            TieBreak::Alternate => {
                let left = self.ties % 2 == 0;
                self.ties = self.ties.wrapping_add(1);
                left
            }
        }
    }
}

/// Slot storage for nodes with a free list for reuse.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T, const S: usize, U> {
    slots: Vec<Option<Node<T, S, U>>>,
    free_list: Vec<usize>,
}

impl<T, const S: usize, U> Default for Arena<T, S, U> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }
}

impl<T, const S: usize, U> Arena<T, S, U> {
    pub(crate) fn reserve(&mut self, n: usize) {
        self.slots.reserve(n);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    /// Number of live nodes.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Access a node; panics if `idx` is stale.
    pub(crate) fn get(&self, idx: NodeIdx) -> &Node<T, S, U> {
        self.slots[idx.get()].as_ref().expect("dangling NodeIdx")
    }

    /// Access a node mutably; panics if `idx` is stale.
    pub(crate) fn get_mut(&mut self, idx: NodeIdx) -> &mut Node<T, S, U> {
        self.slots[idx.get()].as_mut().expect("dangling NodeIdx")
    }

    fn alloc(&mut self, node: Node<T, S, U>) -> NodeIdx {
        if let Some(i) = self.free_list.pop() {
            self.slots[i] = Some(node);
            NodeIdx::new(i)
        } else {
            self.slots.push(Some(node));
            NodeIdx::new(self.slots.len() - 1)
        }
    }

    fn free(&mut self, idx: NodeIdx) {
        let node = self.slots[idx.get()].take();
        debug_assert!(node.is_some(), "double free of {idx:?}");
        self.free_list.push(idx.get());
    }

    /// Allocate a parentless leaf, used as the root of an empty tree.
    pub(crate) fn alloc_leaf(&mut self, bounds: Bounds<T, S>, data: U) -> NodeIdx {
        self.alloc(Node::leaf(bounds, data))
    }
}

impl<T: Scalar, const S: usize, U> Arena<T, S, U> {
    /// Insert `(bounds, data)` below `root`.
    ///
    /// Descends one child at a time until it reaches a leaf, pairs that leaf
    /// with the new one under a fresh inner node, then refreshes every
    /// ancestor. Returns the root of the whole tree and the new leaf.
    pub(crate) fn insert(
        &mut self,
        root: NodeIdx,
        bounds: Bounds<T, S>,
        data: U,
        ties: &mut TieState,
    ) -> (NodeIdx, NodeIdx) {
        let mut at = root;
        while let Kind::Inner { left, right, .. } = self.get(at).kind {
            at = if self.select_least_increaser(left, right, &bounds, ties) {
                left
            } else {
                right
            };
        }

        let parent = self.get(at).parent;
        let merged = self.get(at).bounds.merge(&bounds);
        let leaf = self.alloc(Node::leaf(bounds, data));
        let inner = self.alloc(Node {
            bounds: merged,
            parent: None,
            kind: Kind::Inner {
                left: at,
                right: leaf,
                height: 2,
            },
        });
        self.get_mut(at).parent = Some(inner);
        self.get_mut(leaf).parent = Some(inner);

        let root = match parent {
            Some(parent) => self.replace_child(parent, at, inner),
            None => inner,
        };
        (root, leaf)
    }

    /// Whether `a` (rather than `b`) should receive `bounds`.
    fn select_least_increaser(
        &self,
        a: NodeIdx,
        b: NodeIdx,
        bounds: &Bounds<T, S>,
        ties: &mut TieState,
    ) -> bool {
        let na = self.get(a);
        let nb = self.get(b);

        match (na.bounds.contains(bounds), nb.bounds.contains(bounds)) {
            (true, false) => return true,
            (false, true) => return false,
            (false, false) => {
                let grow_a = na.bounds.merge(bounds).volume() - na.bounds.volume();
                let grow_b = nb.bounds.merge(bounds).volume() - nb.bounds.volume();
                if grow_a < grow_b {
                    return true;
                }
                if grow_b < grow_a {
                    return false;
                }
            }
            (true, true) => {}
        }

        let (ha, hb) = (na.height(), nb.height());
        if ha != hb {
            return ha < hb;
        }
        ties.pick_left()
    }

    /// Recompute the cached bounds and height of an inner node from its children.
    fn refresh(&mut self, at: NodeIdx) {
        let Kind::Inner { left, right, .. } = self.get(at).kind else {
            unreachable!("only inner nodes cache derived bounds");
        };
        let (l, r) = (self.get(left), self.get(right));
        let bounds = l.bounds.merge(&r.bounds);
        let new_height = 1 + l.height().max(r.height());

        let node = self.get_mut(at);
        node.bounds = bounds;
        if let Kind::Inner { height, .. } = &mut node.kind {
            *height = new_height;
        }
    }

    /// Remove a leaf and free it. Returns the new root of the whole tree.
    pub(crate) fn delete_leaf(&mut self, leaf: NodeIdx) -> Option<NodeIdx> {
        debug_assert!(
            matches!(self.get(leaf).kind, Kind::Leaf(_)),
            "delete_leaf called on inner node {leaf:?}"
        );
        let new_root = self
            .get(leaf)
            .parent
            .map(|parent| self.handle_child_deletion(parent, leaf));
        self.free(leaf);
        new_root
    }

    /// `child` of `parent` is going away: promote its sibling into `parent`'s
    /// place and free `parent`. Returns the new root of the whole tree.
    fn handle_child_deletion(&mut self, parent: NodeIdx, child: NodeIdx) -> NodeIdx {
        // Resolve the survivor before any slot changes.
        let Kind::Inner { left, right, .. } = self.get(parent).kind else {
            unreachable!("parent of a node must be an inner node");
        };
        let survivor = if child == left {
            right
        } else {
            debug_assert_eq!(child, right, "{child:?} is not a child of {parent:?}");
            left
        };

        let root = match self.get(parent).parent {
            None => {
                self.get_mut(survivor).parent = None;
                log::trace!("promoted {survivor:?} to tree root");
                survivor
            }
            Some(grandparent) => self.replace_child(grandparent, parent, survivor),
        };
        self.free(parent);
        root
    }

    /// Swap `child` of `at` for `replacement`, then refresh up to the root.
    fn replace_child(&mut self, at: NodeIdx, child: NodeIdx, replacement: NodeIdx) -> NodeIdx {
        self.get_mut(replacement).parent = Some(at);
        if let Kind::Inner { left, right, .. } = &mut self.get_mut(at).kind {
            if *left == child {
                *left = replacement;
            } else {
                debug_assert_eq!(*right, child, "{child:?} is not a child of {at:?}");
                *right = replacement;
            }
        }
        self.update_and_return_root(at)
    }

    /// Refresh `at` and every ancestor; returns the root reached.
    fn update_and_return_root(&mut self, mut at: NodeIdx) -> NodeIdx {
        loop {
            self.refresh(at);
            match self.get(at).parent {
                Some(parent) => at = parent,
                None => return at,
            }
        }
    }
}
