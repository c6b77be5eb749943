//! Node-level operations for BPlusIndex.
//!
//! Everything here touches a single node: lookup, insertion at a position,
//! splitting, and the borrow/merge primitives used by deletion. Linking the
//! results back into the tree (arena ids, parent links, leaf chain) is done by
//! the tree-level operations.

use super::types::{BranchNode, LeafNode, NodeRef};
use crate::compact_arena::NULL_NODE;

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord + Clone, V> LeafNode<K, V> {
    /// Get a value by key from this leaf node.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &self.values[index])
    }

    /// Returns the number of key-value pairs in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sorted keys stored in this leaf.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Values aligned with [`keys`](Self::keys).
    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub(crate) fn binary_search_keys(&self, key: &K) -> Result<usize, usize> {
        self.keys.binary_search(key)
    }

    /// Insert a key-value pair at the specified index.
    pub(crate) fn insert_at_index(&mut self, index: usize, key: K, value: V) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    pub(crate) fn remove_at_index(&mut self, index: usize) -> (K, V) {
        (self.keys.remove(index), self.values.remove(index))
    }

    /// Split this leaf at `len / 2`, returning the new right node and a copy of
    /// its first key for promotion.
    ///
    /// The right node inherits this leaf's `next` and `parent`; the caller links
    /// `self.next` to the right node once it has an arena id.
    pub(crate) fn split(&mut self) -> (LeafNode<K, V>, K) {
        debug_assert!(self.keys.len() >= 2, "splitting a leaf with {} keys", self.keys.len());
        let mid = self.keys.len() / 2;

        let right = LeafNode {
            keys: self.keys.split_off(mid),
            values: self.values.split_off(mid),
            next: self.next,
            parent: self.parent,
        };
        self.next = NULL_NODE;

        let promoted = right.keys[0].clone();
        (right, promoted)
    }

    /// Take the last entry (this leaf is the left sibling of the borrower).
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        Some((self.keys.pop()?, self.values.pop()?))
    }

    /// Take the first entry (this leaf is the right sibling of the borrower).
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        if self.keys.is_empty() {
            return None;
        }
        Some(self.remove_at_index(0))
    }

    /// Accept a borrowed entry at the beginning (from left sibling)
    pub(crate) fn push_front(&mut self, key: K, value: V) {
        self.insert_at_index(0, key, value);
    }

    /// Accept a borrowed entry at the end (from right sibling)
    pub(crate) fn push_back(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    /// Append all entries of the right sibling and take over its `next` link.
    pub(crate) fn merge_from(&mut self, mut other: LeafNode<K, V>) {
        self.keys.append(&mut other.keys);
        self.values.append(&mut other.values);
        self.next = other.next;
    }

    pub fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    pub fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord + Clone> BranchNode<K> {
    /// Index of the child to follow for `key`: the first separator strictly
    /// greater than `key`, or the last child.
    pub fn find_child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Returns the number of separator keys in this branch node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Separator keys.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child links, one more than the separators.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Position of `child` among this branch's children.
    pub(crate) fn child_position(&self, child: NodeRef) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Insert `separator` and `right` immediately after the child at `left_index`.
    ///
    /// Keeps keys and children index-aligned, which is the same order as sorting
    /// children by their first key.
    pub(crate) fn insert_after(&mut self, left_index: usize, separator: K, right: NodeRef) {
        self.keys.insert(left_index, separator);
        self.children.insert(left_index + 1, right);
    }

    /// Split this branch at `len / 2`.
    ///
    /// The middle key is removed and returned for promotion; keys and children
    /// after it move to the new right branch, which inherits `parent`.
    pub(crate) fn split(&mut self) -> (BranchNode<K>, K) {
        debug_assert!(self.keys.len() >= 3, "splitting a branch with {} keys", self.keys.len());
        let mid = self.keys.len() / 2;

        let right = BranchNode {
            keys: self.keys.split_off(mid + 1),
            children: self.children.split_off(mid + 1),
            parent: self.parent,
        };
        let promoted = match self.keys.pop() {
            Some(key) => key,
            None => unreachable!("branch split lost its middle key"),
        };

        (right, promoted)
    }

    /// Take the last separator and child (this branch is the left sibling).
    pub(crate) fn pop_last(&mut self) -> Option<(K, NodeRef)> {
        Some((self.keys.pop()?, self.children.pop()?))
    }

    /// Take the first separator and child (this branch is the right sibling).
    pub(crate) fn pop_first(&mut self) -> Option<(K, NodeRef)> {
        if self.keys.is_empty() {
            return None;
        }
        Some((self.keys.remove(0), self.children.remove(0)))
    }

    /// Append the right sibling's separators and children, pulling `separator`
    /// down from the parent between them.
    pub(crate) fn merge_from(&mut self, separator: K, mut other: BranchNode<K>) {
        self.keys.push(separator);
        self.keys.append(&mut other.keys);
        self.children.append(&mut other.children);
    }
}
