//! # Ordered Containment
//!
//! This module defines [`OrderedChildren`], a generic order-preserving
//! container for entities that carry their own zero-based position among
//! their siblings.
//!
//! # Architecture Note
//! The containment hierarchy has the same shape at every level (boards over
//! lists, lists over cards), so the index-stamp and index-repair logic is
//! written once here and reused per child type, instead of each entity kind
//! carrying its own copy of the algorithm.
//!
//! The invariant maintained across every mutation: the children's `index`
//! fields form the contiguous range `0..n-1` in storage order, with
//! `children[i].index() == i`.

use crate::error::OrderedError;

/// Contract for entities that record their own position among siblings.
pub trait Indexed {
    /// The currently stamped zero-based position.
    fn index(&self) -> usize;

    /// Re-stamps the position. Called only by the owning container.
    fn set_index(&mut self, index: usize);
}

/// Order-preserving sequence of children with self-repairing indices.
#[derive(Debug, Clone)]
pub struct OrderedChildren<T: Indexed> {
    items: Vec<T>,
}

impl<T: Indexed> Default for OrderedChildren<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Indexed> OrderedChildren<T> {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `child`, stamping its index to the tail position first.
    ///
    /// Returns the stamped index.
    pub fn push(&mut self, mut child: T) -> usize {
        let index = self.items.len();
        child.set_index(index);
        self.items.push(child);
        index
    }

    /// Removes the child at `index` and repairs the indices of every sibling
    /// that followed it, restoring the contiguous `0..n-1` range.
    ///
    /// O(n) in the siblings after the deletion point.
    ///
    /// # Errors
    ///
    /// Returns [`OrderedError::OutOfRange`] when `index` does not address a
    /// child; the container is left untouched.
    pub fn remove(&mut self, index: usize) -> Result<T, OrderedError> {
        if index >= self.items.len() {
            return Err(OrderedError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);
        for (position, item) in self.items.iter_mut().enumerate().skip(index) {
            item.set_index(position);
        }
        Ok(removed)
    }

    /// The child at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable access to the child at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// The last child, if any.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T: Indexed> IntoIterator for &'a OrderedChildren<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
