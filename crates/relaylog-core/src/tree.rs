//! The persistent ordered container.

use std::fmt;
use std::sync::Arc;

use crate::compare::{Comparator, Natural};
use crate::error::Result;
use crate::iter::{IntoIter, Iter};
use crate::node::{self, Link};

/// An immutable, self-balancing (AVL) ordered set.
///
/// `insert` and `remove` never modify `self`; they return a new tree that
/// shares every subtree off the modified path with the original. Cloning a
/// tree is a single reference-count bump.
///
/// Elements that compare `Equal` under the tree's [`Comparator`] are the same
/// element: inserting one that is already present is a no-op.
pub struct OrdTree<T, C = Natural> {
    root: Link<T>,
    cmp: C,
}

impl<T> OrdTree<T> {
    /// Create an empty tree ordered by `T: Ord`.
    pub fn new() -> Self {
        Self {
            root: None,
            cmp: Natural,
        }
    }
}

impl<T, C> OrdTree<T, C> {
    /// Create an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self { root: None, cmp }
    }

    /// Number of elements. O(1).
    pub fn len(&self) -> usize {
        node::size(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root; the empty tree has height 0.
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// The smallest element.
    pub fn min(&self) -> Option<&T> {
        node::min(&self.root)
    }

    /// The largest element.
    pub fn max(&self) -> Option<&T> {
        node::max(&self.root)
    }

    /// In-order iterator over borrowed elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Whether both trees share the same root allocation.
    ///
    /// Two empty trees are always `ptr_eq`.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Render the tree sideways for debugging, right subtree on top.
    pub fn diagram(&self) -> String
    where
        T: fmt::Debug,
    {
        crate::diagram::render(&self.root)
    }
}

impl<T, C: Comparator<T>> OrdTree<T, C> {
    /// Whether an element equal to `value` is stored. O(log n).
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Borrow the stored element equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        node::get(&self.root, value, &self.cmp)
    }

    /// Check the ordering and balance invariants of every node.
    pub fn validate(&self) -> Result<()> {
        crate::validation::validate(&self.root, &self.cmp)
    }
}

impl<T: Clone, C: Comparator<T> + Clone> OrdTree<T, C> {
    /// Return a tree that also contains `value`. O(log n).
    ///
    /// If an equal element is already stored the result shares its root
    /// with `self` and the stored element is kept, not replaced.
    #[must_use]
    pub fn insert(&self, value: T) -> Self {
        match node::insert(&self.root, value, &self.cmp) {
            Some(root) => self.with_root(Some(root)),
            None => self.clone(),
        }
    }

    /// Return a tree without the element equal to `value`. O(log n).
    ///
    /// If no such element is stored the result shares its root with `self`.
    #[must_use]
    pub fn remove(&self, value: &T) -> Self {
        match node::remove(&self.root, value, &self.cmp) {
            Some(root) => self.with_root(root),
            None => self.clone(),
        }
    }

    fn with_root(&self, root: Link<T>) -> Self {
        Self {
            root,
            cmp: self.cmp.clone(),
        }
    }
}

impl<T, C: Clone> Clone for OrdTree<T, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<T, C: Default> Default for OrdTree<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for OrdTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for OrdTree<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl<T: Eq, C> Eq for OrdTree<T, C> {}

impl<T, C> FromIterator<T> for OrdTree<T, C>
where
    T: Clone,
    C: Comparator<T> + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |tree, value| tree.insert(value))
    }
}

impl<'a, T, C> IntoIterator for &'a OrdTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone, C> IntoIterator for OrdTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root)
    }
}
