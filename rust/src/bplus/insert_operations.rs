//! INSERT operations for BPlusIndex.
//!
//! New entries always land in a leaf. A node that reaches `order` keys is split
//! immediately and the separator is pushed into its parent, which may split in
//! turn; when the root splits a new root branch is created above it.

use super::types::{BPlusIndex, BranchNode, NodeRef};
use crate::compact_arena::{NodeId, NULL_NODE};
use crate::error::{IndexError, ModifyResult};

impl<K: Ord + Clone, V> BPlusIndex<K, V> {
    // ============================================================================
    // PUBLIC INSERT OPERATIONS
    // ============================================================================

    /// Insert a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::KeyAlreadyExists`] if `key` is present; the stored
    /// value is left untouched. Use [`upsert`](Self::upsert) to overwrite.
    pub fn insert(&mut self, key: K, value: V) -> ModifyResult<()> {
        let (leaf_id, index, matched) = self.find_leaf_for_key_with_match(&key);
        if matched {
            return Err(IndexError::KeyAlreadyExists);
        }
        self.insert_new(leaf_id, index, key, value);
        Ok(())
    }

    /// Insert or overwrite, returning the previous value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::BPlusIndex;
    ///
    /// let mut tree = BPlusIndex::new(4).unwrap();
    /// assert_eq!(tree.upsert(1, "a"), None);
    /// assert_eq!(tree.upsert(1, "b"), Some("a"));
    /// assert_eq!(tree.get(&1), Some(&"b"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        let (leaf_id, index, matched) = self.find_leaf_for_key_with_match(&key);
        if matched {
            let slot = &mut self.leaf_arena[leaf_id].values[index];
            return Some(std::mem::replace(slot, value));
        }
        self.insert_new(leaf_id, index, key, value);
        None
    }

    // ============================================================================
    // SPLITTING
    // ============================================================================

    fn insert_new(&mut self, leaf_id: NodeId, index: usize, key: K, value: V) {
        let leaf = &mut self.leaf_arena[leaf_id];
        leaf.insert_at_index(index, key, value);
        let overflow = leaf.keys.len() >= self.order;
        self.len += 1;

        if overflow {
            self.split_leaf(leaf_id);
        }
    }

    /// Split an overfull leaf and link the new right half into the chain.
    fn split_leaf(&mut self, leaf_id: NodeId) {
        let (right, separator) = self.leaf_arena[leaf_id].split();
        let right_id = self.leaf_arena.allocate(right);
        self.leaf_arena[leaf_id].next = right_id;
        tracing::trace!(left = leaf_id, right = right_id, "split leaf");

        self.insert_into_parent(NodeRef::Leaf(leaf_id), separator, NodeRef::Leaf(right_id));
    }

    /// Split an overfull branch; children moved right are re-parented.
    fn split_branch(&mut self, branch_id: NodeId) {
        let (right, separator) = self.branch_arena[branch_id].split();
        let moved = right.children.clone();
        let right_id = self.branch_arena.allocate(right);
        for child in moved {
            self.set_parent(child, right_id);
        }
        tracing::trace!(left = branch_id, right = right_id, "split branch");

        self.insert_into_parent(
            NodeRef::Branch(branch_id),
            separator,
            NodeRef::Branch(right_id),
        );
    }

    /// Hang `right` next to `left` in their parent, growing a new root when
    /// `left` was the root.
    fn insert_into_parent(&mut self, left: NodeRef, separator: K, right: NodeRef) {
        let parent_id = self.parent_of(left);

        if parent_id == NULL_NODE {
            let mut root = BranchNode::new(self.order);
            root.keys.push(separator);
            root.children.push(left);
            root.children.push(right);
            let root_id = self.branch_arena.allocate(root);

            self.set_parent(left, root_id);
            self.set_parent(right, root_id);
            self.root = NodeRef::Branch(root_id);
            tracing::trace!(root = root_id, height = self.height(), "grew new root");
            return;
        }

        let parent = &mut self.branch_arena[parent_id];
        let Some(left_index) = parent.child_position(left) else {
            unreachable!("node {:?} missing from its parent {}", left, parent_id)
        };
        parent.insert_after(left_index, separator, right);
        let overflow = parent.keys.len() >= self.order;
        self.set_parent(right, parent_id);

        if overflow {
            self.split_branch(parent_id);
        }
    }
}

impl<K: Ord + Clone, V> Extend<(K, V)> for BPlusIndex<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.upsert(key, value);
        }
    }
}

impl<K: Ord + Clone, V> FromIterator<(K, V)> for BPlusIndex<K, V> {
    /// Build an index with the default order; later duplicates overwrite.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::with_default_order();
        tree.extend(iter);
        tree
    }
}
