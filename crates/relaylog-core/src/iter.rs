//! In-order iteration over an [`OrdTree`](crate::OrdTree).

use std::iter::FusedIterator;
use std::sync::Arc;

use crate::node::{Link, Node};

/// Borrowing in-order iterator, created by [`OrdTree::iter`](crate::OrdTree::iter).
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Link<T>) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: crate::node::size(root),
        };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut link: &'a Link<T>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(&node.right);
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Owning in-order iterator.
///
/// Elements are moved out of nodes no other tree references and cloned out
/// of shared ones.
pub struct IntoIter<T> {
    stack: Vec<Arc<Node<T>>>,
    remaining: usize,
}

impl<T: Clone> IntoIter<T> {
    pub(crate) fn new(root: Link<T>) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: crate::node::size(&root),
        };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut link: Link<T>) {
        while let Some(node) = link {
            link = node.left.clone();
            self.stack.push(node);
        }
    }
}

impl<T: Clone> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let node = Arc::try_unwrap(node).unwrap_or_else(|shared| (*shared).clone());
        self.push_left(node.right);
        self.remaining -= 1;
        Some(node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for IntoIter<T> {}
impl<T: Clone> FusedIterator for IntoIter<T> {}
