//! # Relaylog Core
//!
//! The persistent ordered container behind relaylog operation logs.
//!
//! This crate contains no I/O, no async, no networking. It is pure computation
//! over an immutable, self-balancing binary search tree.
//!
//! ## Key Types
//!
//! - [`OrdTree`] - Persistent AVL tree; `insert`/`remove` return a new tree
//!   sharing every untouched subtree with the original
//! - [`Comparator`] - Total order used by a tree, [`Natural`] by default
//! - [`InvariantViolation`] - Reported by [`OrdTree::validate`]
//!
//! ## Usage
//!
//! ```rust
//! use relaylog_core::OrdTree;
//!
//! let empty = OrdTree::new();
//! let one = empty.insert(5);
//! let two = one.insert(3);
//!
//! assert!(!empty.contains(&5));
//! assert!(one.contains(&5));
//! assert_eq!(two.iter().copied().collect::<Vec<_>>(), vec![3, 5]);
//! ```
//!
//! ## Design Notes
//!
//! - **Structural sharing**: nodes live behind `Arc` and are never mutated
//!   after construction, so clones are O(1) and trees can be read from any
//!   number of threads without locking
//! - **Balance**: every tree reachable through the public API has all balance
//!   factors in `{-1, 0, 1}`, so height stays within `1.45 * log2(n + 2)`
//! - **Duplicates**: inserting an element that compares equal to a stored one
//!   is a no-op and returns the original tree

pub mod compare;
pub mod error;
pub mod iter;
pub mod tree;

mod diagram;
mod node;
mod validation;
#[cfg(feature = "serde")]
mod serde_impl;

pub use compare::{Comparator, Natural};
pub use error::{InvariantViolation, Result};
pub use iter::{IntoIter, Iter};
pub use tree::OrdTree;
