//! Error types for the core crate.
//!
//! Tree operations themselves cannot fail; these errors only come out of
//! [`OrdTree::validate`](crate::OrdTree::validate).

use thiserror::Error;

/// A broken structural invariant found while validating a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("ordering violated at depth {depth}")]
    Unordered { depth: usize },

    #[error("balance factor {factor} out of range at depth {depth}")]
    Unbalanced { depth: usize, factor: isize },

    #[error("cached height {cached} does not match actual height {actual} at depth {depth}")]
    StaleHeight {
        depth: usize,
        cached: usize,
        actual: usize,
    },

    #[error("cached size {cached} does not match actual size {actual} at depth {depth}")]
    StaleSize {
        depth: usize,
        cached: usize,
        actual: usize,
    },
}

/// Result type for validation.
pub type Result<T> = std::result::Result<T, InvariantViolation>;
