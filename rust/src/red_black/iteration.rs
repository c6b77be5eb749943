//! In-order iterators for RedBlackIndex.
//!
//! Iteration walks successor links through parent pointers, so no stack is
//! kept and a fresh call always restarts from the smallest key.

use super::{RedBlackIndex, Side};
use crate::compact_arena::{NodeId, NULL_NODE};
use std::ops::{Bound, RangeBounds};

/// Iterator over key-value pairs in ascending key order.
pub struct Iter<'a, K, V> {
    tree: &'a RedBlackIndex<K, V>,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

/// Iterator over keys in ascending order.
pub struct Keys<'a, K, V> {
    items: Iter<'a, K, V>,
}

/// Iterator over values in key order.
pub struct Values<'a, K, V> {
    items: Iter<'a, K, V>,
}

/// Iterator over the entries inside a key range.
pub struct Range<'a, K, V> {
    tree: &'a RedBlackIndex<K, V>,
    next: NodeId,
    end: Bound<K>,
}

impl<K, V> RedBlackIndex<K, V> {
    /// Returns an iterator over all key-value pairs in sorted order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            front: self.extreme(self.root, Side::Left),
            back: self.extreme(self.root, Side::Right),
            remaining: self.len(),
        }
    }

    /// Returns an iterator over all keys in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { items: self.iter() }
    }

    /// Returns an iterator over all values in key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { items: self.iter() }
    }

    /// Visit every entry in order.
    pub fn for_each_in_order<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.iter() {
            visit(key, value);
        }
    }
}

impl<K: Ord + Clone, V> RedBlackIndex<K, V> {
    /// Returns an iterator over key-value pairs in a range.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::RedBlackIndex;
    ///
    /// let mut index = RedBlackIndex::new();
    /// for i in 0..10 {
    ///     index.insert(i, i * 10);
    /// }
    /// let keys: Vec<_> = index.range(3..6).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![3, 4, 5]);
    /// ```
    pub fn range<R>(&self, range: R) -> Range<'_, K, V>
    where
        R: RangeBounds<K>,
    {
        let next = match range.start_bound() {
            Bound::Included(key) => self.lower_bound(key, true),
            Bound::Excluded(key) => self.lower_bound(key, false),
            Bound::Unbounded => self.extreme(self.root, Side::Left),
        };

        Range {
            tree: self,
            next,
            end: range.end_bound().cloned(),
        }
    }

    /// First node whose key is >= `key` (or > when not inclusive).
    fn lower_bound(&self, key: &K, inclusive: bool) -> NodeId {
        let mut candidate = NULL_NODE;
        let mut current = self.root;
        while let Some(node) = self.nodes.get(current) {
            let goes_left = if inclusive {
                node.key >= *key
            } else {
                node.key > *key
            };
            if goes_left {
                candidate = current;
                current = node.left;
            } else {
                current = node.right;
            }
        }
        candidate
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.tree.entry(self.front)?;
        self.remaining -= 1;
        self.front = self.tree.neighbour(self.front, Side::Right);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.tree.entry(self.back)?;
        self.remaining -= 1;
        self.back = self.tree.neighbour(self.back, Side::Left);
        Some(item)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<'a, K: Ord, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.tree.entry(self.next)?;
        let beyond_end = match &self.end {
            Bound::Included(end) => key > end,
            Bound::Excluded(end) => key >= end,
            Bound::Unbounded => false,
        };
        if beyond_end {
            self.next = NULL_NODE;
            return None;
        }
        self.next = self.tree.neighbour(self.next, Side::Right);
        Some((key, value))
    }
}

impl<'a, K, V> IntoIterator for &'a RedBlackIndex<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
