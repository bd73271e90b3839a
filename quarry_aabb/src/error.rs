// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree mutations.

/// Result type alias for tree mutations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Caller-input errors from [`AabbTree::insert`](crate::AabbTree::insert) and
/// [`AabbTree::update`](crate::AabbTree::update).
///
/// A failed call leaves the tree exactly as it was.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError {
    /// The bounds contain a NaN component.
    #[error("cannot add node to AABB tree with invalid bounds")]
    InvalidBounds,

    /// A leaf with the same data is already in the tree.
    #[error("data already in tree")]
    DuplicateKey,

    /// No leaf holds the given data.
    #[error("AABB node not found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn error_display() {
        assert!(format!("{}", TreeError::InvalidBounds).contains("invalid bounds"));
        assert!(format!("{}", TreeError::DuplicateKey).contains("already"));
        assert!(format!("{}", TreeError::NotFound).contains("not found"));
    }
}
