//! GET operations for BPlusIndex.
//!
//! Read-only lookups plus the typed node accessors used by the other modules.

use super::types::{BPlusIndex, BranchNode, LeafNode};
use crate::compact_arena::NodeId;
use crate::error::{IndexError, KeyResult};

impl<K: Ord + Clone, V> BPlusIndex<K, V> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Get a reference to the value associated with a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::BPlusIndex;
    ///
    /// let mut tree = BPlusIndex::new(16).unwrap();
    /// tree.insert(1, "one").unwrap();
    /// assert_eq!(tree.get(&1), Some(&"one"));
    /// assert_eq!(tree.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let (leaf_id, index, matched) = self.find_leaf_for_key_with_match(key);
        if matched {
            self.leaf_arena.get(leaf_id)?.values.get(index)
        } else {
            None
        }
    }

    /// Get a mutable reference to the value for a key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let (leaf_id, index, matched) = self.find_leaf_for_key_with_match(key);
        if matched {
            self.leaf_arena.get_mut(leaf_id)?.values.get_mut(index)
        } else {
            None
        }
    }

    /// Check if key exists in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_leaf_for_key_with_match(key).2
    }

    /// Get the stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let (leaf_id, index, matched) = self.find_leaf_for_key_with_match(key);
        if !matched {
            return None;
        }
        let leaf = self.leaf_arena.get(leaf_id)?;
        Some((leaf.keys.get(index)?, leaf.values.get(index)?))
    }

    /// Look up `key`, reporting a miss as [`IndexError::KeyNotFound`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::{BPlusIndex, IndexError};
    ///
    /// let mut tree = BPlusIndex::new(4).unwrap();
    /// tree.insert(7, "seven").unwrap();
    /// assert_eq!(tree.search(&7), Ok((&7, &"seven")));
    /// assert_eq!(tree.search(&8), Err(IndexError::KeyNotFound));
    /// ```
    pub fn search(&self, key: &K) -> KeyResult<(&K, &V)> {
        self.get_key_value(key).ok_or(IndexError::KeyNotFound)
    }

    /// Get value for a key with default.
    pub fn get_or_default<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    /// Smallest entry, read from the head of the leaf chain.
    pub fn first(&self) -> Option<(&K, &V)> {
        let leaf = self.get_leaf(self.get_first_leaf_id()?)?;
        Some((leaf.keys.first()?, leaf.values.first()?))
    }

    /// Largest entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.get_leaf(self.get_last_leaf_id()?)?;
        Some((leaf.keys.last()?, leaf.values.last()?))
    }

    /// Keys held by the leaf that `key` routes to.
    pub fn find_leaf_keys(&self, key: &K) -> &[K] {
        let (leaf_id, _, _) = self.find_leaf_for_key_with_match(key);
        &self.leaf_arena[leaf_id].keys
    }
}

impl<K, V> BPlusIndex<K, V> {
    // ============================================================================
    // ARENA ACCESS HELPERS
    // ============================================================================

    /// Get a reference to a leaf node in the arena.
    #[inline]
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.leaf_arena.get(id)
    }

    /// Get a reference to a branch node in the arena.
    #[inline]
    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K>> {
        self.branch_arena.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(order: usize, n: i32) -> BPlusIndex<i32, i32> {
        let mut tree = BPlusIndex::new(order).unwrap();
        for i in 0..n {
            tree.insert(i * 2, i).unwrap();
        }
        tree
    }

    #[test]
    fn test_get_and_contains() {
        let tree = filled(4, 40);
        for i in 0..40 {
            assert_eq!(tree.get(&(i * 2)), Some(&i));
            assert!(!tree.contains_key(&(i * 2 + 1)));
        }
        assert_eq!(tree.get(&-1), None);
        assert_eq!(tree.get(&80), None);
    }

    #[test]
    fn test_search_reports_not_found() {
        let tree = filled(3, 10);
        assert_eq!(tree.search(&4), Ok((&4, &2)));
        assert!(tree.search(&5).unwrap_err().is_not_found());
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut tree = filled(4, 10);
        if let Some(v) = tree.get_mut(&6) {
            *v = 99;
        }
        assert_eq!(tree.get(&6), Some(&99));
        assert!(tree.get_mut(&7).is_none());
    }

    #[test]
    fn test_first_last_and_default() {
        let tree = filled(5, 30);
        assert_eq!(tree.first(), Some((&0, &0)));
        assert_eq!(tree.last(), Some((&58, &29)));
        assert_eq!(*tree.get_or_default(&1, &-1), -1);

        let empty: BPlusIndex<i32, i32> = BPlusIndex::new(4).unwrap();
        assert_eq!(empty.first(), None);
        assert_eq!(empty.last(), None);
    }

    #[test]
    fn test_find_leaf_keys_contains_key() {
        let tree = filled(4, 20);
        assert!(tree.find_leaf_keys(&10).contains(&10));
        assert!(tree.find_leaf_keys(&10).len() < 4);
    }
}
