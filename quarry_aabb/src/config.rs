// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree configuration.

/// How insertion picks a child when both candidates are equally good.
///
/// Ties are only reached after the containment, volume-increase and height
/// rules all failed to decide.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Alternate between left and right, starting with left. The counter is
    /// owned by each tree, so the outcome only depends on that tree's history.
    #[default]
    Alternate,
    /// Always descend into the left child.
    PreferLeft,
}

/// Options for [`AabbTree::with_config`](crate::AabbTree::with_config).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeConfig {
    /// Tie-break policy used during insertion.
    pub tie_break: TieBreak,
}
