//! Immutable AVL nodes and the path-copying algorithms over them.
//!
//! Nothing here mutates a node after `Node::new` returns. Every structural
//! change rebuilds the nodes on the path from the root to the change and
//! reuses every other subtree as-is.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::compare::Comparator;

/// A possibly-empty subtree.
pub(crate) type Link<T> = Option<Arc<Node<T>>>;

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    /// Cached at construction: `1 + max(height(left), height(right))`.
    pub(crate) height: usize,
    /// Cached at construction: number of nodes in this subtree.
    pub(crate) size: usize,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T, left: Link<T>, right: Link<T>) -> Arc<Self> {
        let height = 1 + height(&left).max(height(&right));
        let size = 1 + size(&left) + size(&right);
        Arc::new(Self {
            value,
            left,
            right,
            height,
            size,
        })
    }

    pub(crate) fn leaf(value: T) -> Arc<Self> {
        Self::new(value, None, None)
    }

    /// `height(right) - height(left)`.
    pub(crate) fn balance_factor(&self) -> isize {
        balance_factor(&self.left, &self.right)
    }
}

pub(crate) fn height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

pub(crate) fn size<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

fn balance_factor<T>(left: &Link<T>, right: &Link<T>) -> isize {
    height(right) as isize - height(left) as isize
}

/// Take a node apart, moving out of it when this is the last reference and
/// cloning the value otherwise.
fn into_parts<T: Clone>(node: Arc<Node<T>>) -> (T, Link<T>, Link<T>) {
    let node = Arc::try_unwrap(node).unwrap_or_else(|shared| (*shared).clone());
    (node.value, node.left, node.right)
}

/// Right rotation of `(value, left, right)` around `left`.
///
/// ```text
///       value            l
///      /     \          / \
///     l       c   =>   a   value
///    / \                  /     \
///   a   b                b       c
/// ```
fn rotate_right<T: Clone>(value: T, left: Arc<Node<T>>, right: Link<T>) -> Arc<Node<T>> {
    let (l, a, b) = into_parts(left);
    Node::new(l, a, Some(Node::new(value, b, right)))
}

/// Mirror of [`rotate_right`].
fn rotate_left<T: Clone>(value: T, left: Link<T>, right: Arc<Node<T>>) -> Arc<Node<T>> {
    let (r, b, c) = into_parts(right);
    Node::new(r, Some(Node::new(value, left, b)), c)
}

fn rotate_node_left<T: Clone>(node: Arc<Node<T>>) -> Arc<Node<T>> {
    match into_parts(node) {
        (value, left, Some(right)) => rotate_left(value, left, right),
        (value, left, None) => Node::new(value, left, None),
    }
}

fn rotate_node_right<T: Clone>(node: Arc<Node<T>>) -> Arc<Node<T>> {
    match into_parts(node) {
        (value, Some(left), right) => rotate_right(value, left, right),
        (value, None, right) => Node::new(value, None, right),
    }
}

/// Build a node from children that were balanced before one insertion or
/// removal below them, restoring the `[-1, 1]` balance bound.
pub(crate) fn balance<T: Clone>(value: T, left: Link<T>, right: Link<T>) -> Arc<Node<T>> {
    match (balance_factor(&left, &right), left, right) {
        (factor, Some(left), right) if factor < -1 => {
            let left = if left.balance_factor() > 0 {
                rotate_node_left(left)
            } else {
                left
            };
            rotate_right(value, left, right)
        }
        (factor, left, Some(right)) if factor > 1 => {
            let right = if right.balance_factor() < 0 {
                rotate_node_right(right)
            } else {
                right
            };
            rotate_left(value, left, right)
        }
        (_, left, right) => Node::new(value, left, right),
    }
}

pub(crate) fn get<'a, T, C>(mut link: &'a Link<T>, value: &T, cmp: &C) -> Option<&'a T>
where
    C: Comparator<T>,
{
    while let Some(node) = link {
        match cmp.compare(value, &node.value) {
            Ordering::Less => link = &node.left,
            Ordering::Greater => link = &node.right,
            Ordering::Equal => return Some(&node.value),
        }
    }
    None
}

pub(crate) fn min<T>(mut link: &Link<T>) -> Option<&T> {
    let mut found = None;
    while let Some(node) = link {
        found = Some(&node.value);
        link = &node.left;
    }
    found
}

pub(crate) fn max<T>(mut link: &Link<T>) -> Option<&T> {
    let mut found = None;
    while let Some(node) = link {
        found = Some(&node.value);
        link = &node.right;
    }
    found
}

/// Insert `value` below `link`.
///
/// Returns `None` when an equal element is already stored, leaving the
/// caller free to keep the original subtree.
pub(crate) fn insert<T, C>(link: &Link<T>, value: T, cmp: &C) -> Option<Arc<Node<T>>>
where
    T: Clone,
    C: Comparator<T>,
{
    let Some(node) = link else {
        return Some(Node::leaf(value));
    };

    match cmp.compare(&value, &node.value) {
        Ordering::Less => insert(&node.left, value, cmp)
            .map(|left| balance(node.value.clone(), Some(left), node.right.clone())),
        Ordering::Greater => insert(&node.right, value, cmp)
            .map(|right| balance(node.value.clone(), node.left.clone(), Some(right))),
        Ordering::Equal => None,
    }
}

/// Remove the element equal to `value` from below `link`.
///
/// Returns `None` when no such element exists, otherwise the replacement
/// subtree (which may itself be empty).
pub(crate) fn remove<T, C>(link: &Link<T>, value: &T, cmp: &C) -> Option<Link<T>>
where
    T: Clone,
    C: Comparator<T>,
{
    let node = link.as_ref()?;

    match cmp.compare(value, &node.value) {
        Ordering::Less => remove(&node.left, value, cmp)
            .map(|left| Some(balance(node.value.clone(), left, node.right.clone()))),
        Ordering::Greater => remove(&node.right, value, cmp)
            .map(|right| Some(balance(node.value.clone(), node.left.clone(), right))),
        Ordering::Equal => Some(match (&node.left, &node.right) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(Arc::clone(child)),
            (Some(_), Some(right)) => {
                // Replace with the in-order successor.
                let (successor, right) = remove_min(right);
                Some(balance(successor, node.left.clone(), right))
            }
        }),
    }
}

/// Split off the leftmost element of a subtree.
fn remove_min<T: Clone>(node: &Arc<Node<T>>) -> (T, Link<T>) {
    match &node.left {
        None => (node.value.clone(), node.right.clone()),
        Some(left) => {
            let (min, left) = remove_min(left);
            (
                min,
                Some(balance(node.value.clone(), left, node.right.clone())),
            )
        }
    }
}
