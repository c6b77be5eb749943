//! Iterator implementations for BPlusIndex.
//!
//! Every iterator walks the leaf linked list: the tree is descended once to
//! find the starting leaf, after which moving on costs one arena lookup per
//! leaf rather than per entry.

use super::types::{BPlusIndex, LeafNode};
use crate::compact_arena::{NodeId, NULL_NODE};
use std::ops::{Bound, RangeBounds};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Position inside the leaf chain with the current leaf cached.
struct LeafCursor<'a, K, V> {
    tree: &'a BPlusIndex<K, V>,
    leaf: Option<&'a LeafNode<K, V>>,
    index: usize,
}

/// Iterator over key-value pairs in ascending key order.
pub struct ItemIterator<'a, K, V> {
    cursor: LeafCursor<'a, K, V>,
    remaining: usize,
}

/// Iterator over keys in ascending order.
pub struct KeyIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over values in key order.
pub struct ValueIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over the entries inside a key range.
pub struct RangeIterator<'a, K, V> {
    cursor: LeafCursor<'a, K, V>,
    end: Bound<K>,
    finished: bool,
}

/// Iterator over the leaves in chain order, yielding each leaf with its id.
pub struct LeafChain<'a, K, V> {
    tree: &'a BPlusIndex<K, V>,
    next: NodeId,
}

// ============================================================================
// BPLUSINDEX ITERATOR METHODS
// ============================================================================

impl<K, V> BPlusIndex<K, V> {
    /// Returns an iterator over all key-value pairs in sorted order.
    pub fn iter(&self) -> ItemIterator<'_, K, V> {
        let start = self.get_first_leaf_id().unwrap_or(NULL_NODE);
        ItemIterator {
            cursor: LeafCursor::at(self, start, 0),
            remaining: self.len,
        }
    }

    /// Alias of [`iter`](Self::iter).
    pub fn items(&self) -> ItemIterator<'_, K, V> {
        self.iter()
    }

    /// Returns an iterator over all keys in sorted order.
    pub fn keys(&self) -> KeyIterator<'_, K, V> {
        KeyIterator { items: self.iter() }
    }

    /// Returns an iterator over all values in key order.
    pub fn values(&self) -> ValueIterator<'_, K, V> {
        ValueIterator { items: self.iter() }
    }

    /// Walk the leaf chain from the leftmost leaf.
    pub fn leaf_chain(&self) -> LeafChain<'_, K, V> {
        LeafChain {
            tree: self,
            next: self.get_first_leaf_id().unwrap_or(NULL_NODE),
        }
    }
}

impl<K: Ord + Clone, V> BPlusIndex<K, V> {
    /// Returns an iterator over key-value pairs in a range.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::BPlusIndex;
    ///
    /// let mut tree = BPlusIndex::new(4).unwrap();
    /// for i in 0..20 {
    ///     tree.insert(i, ()).unwrap();
    /// }
    /// let keys: Vec<_> = tree.range(5..=8).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [5, 6, 7, 8]);
    /// ```
    pub fn range<R>(&self, range: R) -> RangeIterator<'_, K, V>
    where
        R: RangeBounds<K>,
    {
        let (leaf_id, index) = match range.start_bound() {
            Bound::Included(key) => {
                let (leaf_id, index, _) = self.find_leaf_for_key_with_match(key);
                (leaf_id, index)
            }
            Bound::Excluded(key) => {
                let (leaf_id, index, matched) = self.find_leaf_for_key_with_match(key);
                (leaf_id, if matched { index + 1 } else { index })
            }
            Bound::Unbounded => (self.get_first_leaf_id().unwrap_or(NULL_NODE), 0),
        };

        RangeIterator {
            cursor: LeafCursor::at(self, leaf_id, index),
            end: range.end_bound().cloned(),
            finished: false,
        }
    }
}

// ============================================================================
// CURSOR IMPLEMENTATION
// ============================================================================

impl<'a, K, V> LeafCursor<'a, K, V> {
    fn at(tree: &'a BPlusIndex<K, V>, leaf_id: NodeId, index: usize) -> Self {
        Self {
            tree,
            leaf: tree.get_leaf(leaf_id),
            index,
        }
    }

    /// Next entry, hopping to the following leaf when this one is exhausted.
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        loop {
            let leaf = self.leaf?;
            let entry = (leaf.keys.get(self.index), leaf.values.get(self.index));
            if let (Some(key), Some(value)) = entry {
                self.index += 1;
                return Some((key, value));
            }
            // only arena access while iterating
            self.leaf = self.tree.get_leaf(leaf.next);
            self.index = 0;
        }
    }
}

impl<'a, K, V> Iterator for ItemIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for ItemIterator<'_, K, V> {}

impl<'a, K, V> Iterator for KeyIterator<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<'a, K, V> Iterator for ValueIterator<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<'a, K: Ord, V> Iterator for RangeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let (key, value) = self.cursor.next()?;
        let beyond_end = match &self.end {
            Bound::Included(end) => key > end,
            Bound::Excluded(end) => key >= end,
            Bound::Unbounded => false,
        };
        if beyond_end {
            self.finished = true;
            return None;
        }
        Some((key, value))
    }
}

impl<'a, K, V> Iterator for LeafChain<'a, K, V> {
    type Item = (NodeId, &'a LeafNode<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let leaf = self.tree.get_leaf(id)?;
        self.next = leaf.next;
        Some((id, leaf))
    }
}

impl<'a, K, V> IntoIterator for &'a BPlusIndex<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = ItemIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
