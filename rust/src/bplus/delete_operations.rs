//! DELETE operations for BPlusIndex.
//!
//! Removal takes the entry out of its leaf and then restores the minimum
//! occupancy bottom-up: borrow from the left sibling, else from the right
//! sibling, else merge with a sibling and repeat at the parent. A root branch
//! left with a single child is replaced by that child.

use super::types::{BPlusIndex, NodeRef};
use crate::compact_arena::{NodeId, NULL_NODE};
use crate::error::{IndexError, ModifyResult};

impl<K: Ord + Clone, V> BPlusIndex<K, V> {
    // ============================================================================
    // PUBLIC DELETE OPERATIONS
    // ============================================================================

    /// Remove a key, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::BPlusIndex;
    ///
    /// let mut tree = BPlusIndex::new(4).unwrap();
    /// for i in 0..20 {
    ///     tree.insert(i, i).unwrap();
    /// }
    /// assert_eq!(tree.remove(&7), Some(7));
    /// assert_eq!(tree.remove(&7), None);
    /// assert_eq!(tree.len(), 19);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove a key, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let (leaf_id, index, matched) = self.find_leaf_for_key_with_match(key);
        if !matched {
            return None;
        }

        let entry = self.leaf_arena[leaf_id].remove_at_index(index);
        self.len -= 1;
        self.rebalance(NodeRef::Leaf(leaf_id));
        Some(entry)
    }

    /// Remove a key, reporting a miss as [`IndexError::KeyNotFound`].
    ///
    /// Debug builds re-check the tree invariants afterwards.
    pub fn try_remove(&mut self, key: &K) -> ModifyResult<V> {
        let value = self.remove(key).ok_or(IndexError::KeyNotFound)?;
        if cfg!(debug_assertions) {
            self.validate_for_operation("try_remove")?;
        }
        Ok(value)
    }

    /// Remove and return the smallest entry.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let key = self.first()?.0.clone();
        self.remove_entry(&key)
    }

    /// Remove and return the largest entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let key = self.last()?.0.clone();
        self.remove_entry(&key)
    }

    // ============================================================================
    // REBALANCING
    // ============================================================================

    /// Restore minimum occupancy at `node` after it lost a key.
    fn rebalance(&mut self, node: NodeRef) {
        let parent_id = self.parent_of(node);
        if parent_id == NULL_NODE {
            self.collapse_root_if_needed();
            return;
        }

        let min_keys = self.min_keys();
        if self.key_count(node) >= min_keys {
            return;
        }

        let parent = &self.branch_arena[parent_id];
        let Some(position) = parent.child_position(node) else {
            unreachable!("node {:?} missing from its parent {}", node, parent_id)
        };
        let left = position.checked_sub(1).map(|i| parent.children[i]);
        let right = parent.children.get(position + 1).copied();

        if let Some(left) = left.filter(|&l| self.key_count(l) > min_keys) {
            self.borrow_from_left(node, left, parent_id, position - 1);
        } else if let Some(right) = right.filter(|&r| self.key_count(r) > min_keys) {
            self.borrow_from_right(node, right, parent_id, position);
        } else if let Some(left) = left {
            self.merge_into_left(left, node, parent_id, position - 1);
            self.rebalance(NodeRef::Branch(parent_id));
        } else if let Some(right) = right {
            self.merge_into_left(node, right, parent_id, position);
            self.rebalance(NodeRef::Branch(parent_id));
        }
    }

    /// Move the left sibling's last entry into `node`.
    ///
    /// `separator` indexes the parent key between the two siblings.
    fn borrow_from_left(
        &mut self,
        node: NodeRef,
        left: NodeRef,
        parent_id: NodeId,
        separator: usize,
    ) {
        tracing::trace!(?node, ?left, "borrow from left sibling");
        match (node, left) {
            (NodeRef::Leaf(node_id), NodeRef::Leaf(left_id)) => {
                let Some((key, value)) = self.leaf_arena[left_id].pop_last() else {
                    return;
                };
                self.branch_arena[parent_id].keys[separator] = key.clone();
                self.leaf_arena[node_id].push_front(key, value);
            }
            (NodeRef::Branch(node_id), NodeRef::Branch(left_id)) => {
                let Some((key, child)) = self.branch_arena[left_id].pop_last() else {
                    return;
                };
                let pulled_down =
                    std::mem::replace(&mut self.branch_arena[parent_id].keys[separator], key);
                let branch = &mut self.branch_arena[node_id];
                branch.keys.insert(0, pulled_down);
                branch.children.insert(0, child);
                self.set_parent(child, node_id);
            }
            _ => unreachable!("siblings {:?} and {:?} on different levels", node, left),
        }
    }

    /// Move the right sibling's first entry into `node`.
    fn borrow_from_right(
        &mut self,
        node: NodeRef,
        right: NodeRef,
        parent_id: NodeId,
        separator: usize,
    ) {
        tracing::trace!(?node, ?right, "borrow from right sibling");
        match (node, right) {
            (NodeRef::Leaf(node_id), NodeRef::Leaf(right_id)) => {
                let Some((key, value)) = self.leaf_arena[right_id].pop_first() else {
                    return;
                };
                self.leaf_arena[node_id].push_back(key, value);
                if let Some(new_first) = self.leaf_arena[right_id].first_key().cloned() {
                    self.branch_arena[parent_id].keys[separator] = new_first;
                }
            }
            (NodeRef::Branch(node_id), NodeRef::Branch(right_id)) => {
                let Some((key, child)) = self.branch_arena[right_id].pop_first() else {
                    return;
                };
                let pulled_down =
                    std::mem::replace(&mut self.branch_arena[parent_id].keys[separator], key);
                let branch = &mut self.branch_arena[node_id];
                branch.keys.push(pulled_down);
                branch.children.push(child);
                self.set_parent(child, node_id);
            }
            _ => unreachable!("siblings {:?} and {:?} on different levels", node, right),
        }
    }

    /// Fold `right` into `left` and drop their separator from the parent.
    fn merge_into_left(
        &mut self,
        left: NodeRef,
        right: NodeRef,
        parent_id: NodeId,
        separator: usize,
    ) {
        tracing::trace!(?left, ?right, "merge siblings");
        let parent = &mut self.branch_arena[parent_id];
        let pulled_down = parent.keys.remove(separator);
        parent.children.remove(separator + 1);

        match (left, right) {
            (NodeRef::Leaf(left_id), NodeRef::Leaf(right_id)) => {
                let Some(absorbed) = self.leaf_arena.deallocate(right_id) else {
                    unreachable!("leaf {} vanished during merge", right_id)
                };
                self.leaf_arena[left_id].merge_from(absorbed);
            }
            (NodeRef::Branch(left_id), NodeRef::Branch(right_id)) => {
                let Some(absorbed) = self.branch_arena.deallocate(right_id) else {
                    unreachable!("branch {} vanished during merge", right_id)
                };
                let moved = absorbed.children.clone();
                self.branch_arena[left_id].merge_from(pulled_down, absorbed);
                for child in moved {
                    self.set_parent(child, left_id);
                }
            }
            _ => unreachable!("siblings {:?} and {:?} on different levels", left, right),
        }
    }

    /// Replace a root branch that has run out of separators by its only child.
    fn collapse_root_if_needed(&mut self) {
        while let NodeRef::Branch(root_id) = self.root {
            let root = &self.branch_arena[root_id];
            if !root.keys.is_empty() {
                return;
            }
            let Some(&child) = root.children.first() else {
                unreachable!("root branch {} has no children", root_id)
            };

            self.branch_arena.deallocate(root_id);
            self.set_parent(child, NULL_NODE);
            self.root = child;
            tracing::trace!(?child, "collapsed root");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(order: usize, n: i32) -> BPlusIndex<i32, i32> {
        let mut tree = BPlusIndex::new(order).unwrap();
        for i in 0..n {
            tree.insert(i, i * 10).unwrap();
        }
        tree
    }

    #[test]
    fn test_remove_missing_key() {
        let mut tree = filled(4, 10);
        assert_eq!(tree.remove(&42), None);
        assert_eq!(tree.try_remove(&42), Err(IndexError::KeyNotFound));
        assert_eq!(tree.len(), 10);
    }

    #[test]
    fn test_remove_all_ascending_collapses_to_leaf_root() {
        let mut tree = filled(4, 64);
        for i in 0..64 {
            assert_eq!(tree.remove(&i), Some(i * 10));
            tree.check_invariants().unwrap();
        }
        assert!(tree.is_empty());
        assert!(tree.is_leaf_root());
        assert_eq!(tree.branch_arena.len(), 0);
        assert_eq!(tree.leaf_arena.len(), 1);
    }

    #[test]
    fn test_remove_all_descending() {
        let mut tree = filled(3, 50);
        for i in (0..50).rev() {
            assert_eq!(tree.remove_entry(&i), Some((i, i * 10)));
            tree.check_invariants().unwrap();
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_borrow_from_right_updates_separator() {
        let mut tree = filled(4, 4);
        // leaves [0,1] [2,3] under separator 2; add 4 so the right leaf can lend
        tree.insert(4, 40).unwrap();
        tree.remove(&0);
        tree.remove(&1);
        tree.check_invariants().unwrap();
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_pop_first_and_last() {
        let mut tree = filled(5, 30);
        assert_eq!(tree.pop_first(), Some((0, 0)));
        assert_eq!(tree.pop_last(), Some((29, 290)));
        assert_eq!(tree.len(), 28);
        tree.check_invariants().unwrap();

        let mut empty: BPlusIndex<i32, i32> = BPlusIndex::new(4).unwrap();
        assert_eq!(empty.pop_first(), None);
    }

    #[test]
    fn test_interleaved_remove_keeps_chain() {
        let mut tree = filled(4, 100);
        for i in (0..100).step_by(3) {
            tree.remove(&i);
        }
        tree.check_invariants().unwrap();
        let expected: Vec<i32> = (0..100).filter(|i| i % 3 != 0).collect();
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), expected);
    }
}
