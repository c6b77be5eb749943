//! Tree structure management operations for BPlusIndex.
//!
//! Size queries, clearing, node counting, descent helpers, and the parent-link
//! accessors shared by insertion and deletion.

use super::types::{BPlusIndex, LeafNode, NodeRef};
use crate::compact_arena::{NodeId, NULL_NODE};

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K, V> BPlusIndex<K, V> {
    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The current root node.
    pub fn root_ref(&self) -> NodeRef {
        self.root
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// Number of levels, a lone root leaf being height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let NodeRef::Branch(id) = current {
            match self.branch_arena.get(id).and_then(|b| b.children.first()) {
                Some(&child) => current = child,
                None => break,
            }
            height += 1;
        }
        height
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Clear all items from the tree.
    pub fn clear(&mut self) {
        tracing::debug!(entries = self.len, "clearing b+ index");
        self.leaf_arena.clear();
        self.branch_arena.clear();

        let root_id = self.leaf_arena.allocate(LeafNode::new(self.order));
        self.root = NodeRef::Leaf(root_id);
        self.len = 0;
    }

    /// Count the number of leaf and branch nodes actually in the tree structure.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        self.count_nodes_recursive(self.root)
    }

    fn count_nodes_recursive(&self, node: NodeRef) -> (usize, usize) {
        match node {
            NodeRef::Leaf(_) => (1, 0),
            NodeRef::Branch(id) => match self.branch_arena.get(id) {
                Some(branch) => branch
                    .children
                    .iter()
                    .map(|&child| self.count_nodes_recursive(child))
                    .fold((0, 1), |(leaves, branches), (l, b)| {
                        (leaves + l, branches + b)
                    }),
                None => (0, 0),
            },
        }
    }

    // ============================================================================
    // TREE NAVIGATION HELPERS
    // ============================================================================

    /// Get the ID of the first (leftmost) leaf in the tree
    pub(crate) fn get_first_leaf_id(&self) -> Option<NodeId> {
        self.edge_leaf_id(|children| children.first())
    }

    /// Get the ID of the last (rightmost) leaf in the tree
    pub(crate) fn get_last_leaf_id(&self) -> Option<NodeId> {
        self.edge_leaf_id(|children| children.last())
    }

    fn edge_leaf_id<F>(&self, pick: F) -> Option<NodeId>
    where
        F: Fn(&[NodeRef]) -> Option<&NodeRef>,
    {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return Some(id),
                NodeRef::Branch(id) => {
                    current = *pick(self.branch_arena.get(id)?.children.as_slice())?;
                }
            }
        }
    }

    // ============================================================================
    // PARENT LINKS
    // ============================================================================

    pub(crate) fn parent_of(&self, node: NodeRef) -> NodeId {
        match node {
            NodeRef::Leaf(id) => self.leaf_arena[id].parent,
            NodeRef::Branch(id) => self.branch_arena[id].parent,
        }
    }

    pub(crate) fn set_parent(&mut self, node: NodeRef, parent: NodeId) {
        match node {
            NodeRef::Leaf(id) => self.leaf_arena[id].parent = parent,
            NodeRef::Branch(id) => self.branch_arena[id].parent = parent,
        }
    }

    /// Number of keys held by a node.
    pub(crate) fn key_count(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(id) => self.leaf_arena[id].keys.len(),
            NodeRef::Branch(id) => self.branch_arena[id].keys.len(),
        }
    }

    pub(crate) fn is_root(&self, node: NodeRef) -> bool {
        node == self.root && self.parent_of(node) == NULL_NODE
    }
}

impl<K: Ord + Clone, V> BPlusIndex<K, V> {
    /// Descend to the leaf responsible for `key`.
    ///
    /// Returns `(leaf_id, index, matched)` where `index` is the key's position
    /// (or insertion point) and `matched` says whether the key is present.
    #[inline]
    pub(crate) fn find_leaf_for_key_with_match(&self, key: &K) -> (NodeId, usize, bool) {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(leaf_id) => {
                    return match self.leaf_arena[leaf_id].binary_search_keys(key) {
                        Ok(index) => (leaf_id, index, true),
                        Err(index) => (leaf_id, index, false),
                    };
                }
                NodeRef::Branch(branch_id) => {
                    let branch = &self.branch_arena[branch_id];
                    current = branch.children[branch.find_child_index(key)];
                }
            }
        }
    }
}
