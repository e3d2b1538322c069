//! Structural validation of trees.
//!
//! Used by tests and debug tooling; the tree operations maintain these
//! invariants on their own.

use std::cmp::Ordering;

use crate::compare::Comparator;
use crate::error::{InvariantViolation, Result};
use crate::node::Link;

/// Validate every node reachable from `root`:
///
/// - every element in a left subtree compares less than its ancestor, every
///   element in a right subtree compares greater
/// - every balance factor is in `{-1, 0, 1}`
/// - cached heights and sizes match the actual subtrees
pub(crate) fn validate<T, C: Comparator<T>>(root: &Link<T>, cmp: &C) -> Result<()> {
    check(root, cmp, None, None, 0).map(|_| ())
}

/// Returns `(height, size)` of the checked subtree.
fn check<T, C: Comparator<T>>(
    link: &Link<T>,
    cmp: &C,
    lower: Option<&T>,
    upper: Option<&T>,
    depth: usize,
) -> Result<(usize, usize)> {
    let Some(node) = link else {
        return Ok((0, 0));
    };

    let above_lower = lower.map_or(true, |low| cmp.compare(low, &node.value) == Ordering::Less);
    let below_upper = upper.map_or(true, |high| cmp.compare(&node.value, high) == Ordering::Less);
    if !(above_lower && below_upper) {
        return Err(InvariantViolation::Unordered { depth });
    }

    let (left_height, left_size) = check(&node.left, cmp, lower, Some(&node.value), depth + 1)?;
    let (right_height, right_size) = check(&node.right, cmp, Some(&node.value), upper, depth + 1)?;

    let factor = right_height as isize - left_height as isize;
    if !(-1..=1).contains(&factor) {
        return Err(InvariantViolation::Unbalanced { depth, factor });
    }

    let height = 1 + left_height.max(right_height);
    if node.height != height {
        return Err(InvariantViolation::StaleHeight {
            depth,
            cached: node.height,
            actual: height,
        });
    }

    let size = 1 + left_size + right_size;
    if node.size != size {
        return Err(InvariantViolation::StaleSize {
            depth,
            cached: node.size,
            actual: size,
        });
    }

    Ok((height, size))
}
