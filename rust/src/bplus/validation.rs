//! Validation and debugging utilities for BPlusIndex.
//!
//! The checker walks the tree once, checking ordering, fan-out, depth and
//! parent links, then compares the leaf chain and the arenas against what the
//! walk saw.

use super::types::{BPlusIndex, NodeRef};
use crate::compact_arena::{NodeId, NULL_NODE};
use crate::error::{IndexError, IndexResult};
use std::fmt::{Debug, Write};

/// State accumulated while walking the tree.
struct Walk {
    leaf_depth: Option<usize>,
    leaves: Vec<NodeId>,
    entries: usize,
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord + Clone, V> BPlusIndex<K, V> {
    /// Check the structural invariants, returning the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        if !self.is_root(self.root) {
            return Err("root has a parent link".to_string());
        }

        let mut walk = Walk {
            leaf_depth: None,
            leaves: Vec::new(),
            entries: 0,
        };
        self.check_node(self.root, NULL_NODE, None, None, 0, &mut walk)?;

        if walk.entries != self.len {
            return Err(format!(
                "tree holds {} entries but len is {}",
                walk.entries, self.len
            ));
        }

        self.check_linked_list_invariants(&walk.leaves)?;
        self.check_arena_tree_consistency()
            .map_err(|e| e.to_string())
    }

    /// Returns true if all invariants are satisfied.
    pub fn is_valid(&self) -> bool {
        self.check_invariants().is_ok()
    }

    /// Check tree state, reporting a violation as an [`IndexError`].
    pub fn validate_for_operation(&self, operation: &str) -> IndexResult<()> {
        self.check_invariants()
            .map_err(|e| IndexError::data_integrity(operation, &e))
    }

    fn check_node(
        &self,
        node: NodeRef,
        expected_parent: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        walk: &mut Walk,
    ) -> Result<(), String> {
        let is_root = expected_parent == NULL_NODE;
        if self.parent_of_checked(node) != Some(expected_parent) {
            return Err(format!("{:?} has a stale parent link", node));
        }

        let keys = match node {
            NodeRef::Leaf(id) => &self.leaf_arena[id].keys,
            NodeRef::Branch(id) => &self.branch_arena[id].keys,
        };
        if keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(format!("{:?} keys are not strictly ascending", node));
        }
        if keys.len() > self.max_keys() {
            return Err(format!(
                "{:?} holds {} keys, above the maximum {}",
                node,
                keys.len(),
                self.max_keys()
            ));
        }
        if !is_root && keys.len() < self.min_keys() {
            return Err(format!(
                "{:?} holds {} keys, below the minimum {}",
                node,
                keys.len(),
                self.min_keys()
            ));
        }
        if let (Some(lower), Some(first)) = (lower, keys.first()) {
            if first < lower {
                return Err(format!("{:?} holds a key below its separator", node));
            }
        }
        if let (Some(upper), Some(last)) = (upper, keys.last()) {
            if last >= upper {
                return Err(format!("{:?} holds a key at or above its separator", node));
            }
        }

        match node {
            NodeRef::Leaf(id) => {
                let leaf = &self.leaf_arena[id];
                if leaf.values.len() != leaf.keys.len() {
                    return Err(format!("leaf {} has misaligned values", id));
                }
                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(format!(
                            "leaf {} at depth {} but others at depth {}",
                            id, depth, expected
                        ));
                    }
                    Some(_) => {}
                }
                walk.leaves.push(id);
                walk.entries += leaf.keys.len();
                Ok(())
            }
            NodeRef::Branch(id) => {
                let branch = &self.branch_arena[id];
                if branch.keys.is_empty() {
                    return Err(format!("branch {} has no separators", id));
                }
                if branch.children.len() != branch.keys.len() + 1 {
                    return Err(format!(
                        "branch {} has {} keys but {} children",
                        id,
                        branch.keys.len(),
                        branch.children.len()
                    ));
                }
                for (i, &child) in branch.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(&branch.keys[i - 1]) };
                    let child_upper = branch.keys.get(i).or(upper);
                    self.check_node(child, id, child_lower, child_upper, depth + 1, walk)?;
                }
                Ok(())
            }
        }
    }

    /// The leaf chain must visit exactly the leaves seen by the walk, in order.
    fn check_linked_list_invariants(
        &self,
        leaves_in_tree_order: &[NodeId],
    ) -> Result<(), String> {
        let mut chain = Vec::with_capacity(leaves_in_tree_order.len());
        for (id, _) in self.leaf_chain() {
            if chain.len() > leaves_in_tree_order.len() {
                return Err("leaf chain is longer than the tree (cycle?)".to_string());
            }
            chain.push(id);
        }
        if chain != leaves_in_tree_order {
            return Err(format!(
                "leaf chain {:?} does not match tree order {:?}",
                chain, leaves_in_tree_order
            ));
        }

        let mut previous: Option<&K> = None;
        for key in self.keys() {
            if previous.is_some_and(|p| p >= key) {
                return Err("leaf chain yields keys out of order".to_string());
            }
            previous = Some(key);
        }
        Ok(())
    }

    /// Check that arena allocation matches tree structure.
    fn check_arena_tree_consistency(&self) -> IndexResult<()> {
        let (tree_leaves, tree_branches) = self.count_nodes_in_tree();
        if tree_leaves != self.leaf_arena.len() {
            return Err(IndexError::corrupted_tree(
                "Leaf arena",
                &format!("{} in tree vs {} in arena", tree_leaves, self.leaf_arena.len()),
            ));
        }
        if tree_branches != self.branch_arena.len() {
            return Err(IndexError::corrupted_tree(
                "Branch arena",
                &format!(
                    "{} in tree vs {} in arena",
                    tree_branches,
                    self.branch_arena.len()
                ),
            ));
        }
        Ok(())
    }
}

impl<K, V> BPlusIndex<K, V> {
    fn parent_of_checked(&self, node: NodeRef) -> Option<NodeId> {
        match node {
            NodeRef::Leaf(id) => self.leaf_arena.get(id).map(|leaf| leaf.parent),
            NodeRef::Branch(id) => self.branch_arena.get(id).map(|branch| branch.parent),
        }
    }

    /// Number of entries in each leaf, in chain order.
    pub fn leaf_sizes(&self) -> Vec<usize> {
        self.leaf_chain().map(|(_, leaf)| leaf.keys.len()).collect()
    }
}

// ============================================================================
// DEBUG OUTPUT
// ============================================================================

impl<K: Debug, V> BPlusIndex<K, V> {
    /// Render the tree top-down, one node per line, children indented.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root, 0, &mut out);
        out
    }

    fn render_node(&self, node: NodeRef, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match node {
            NodeRef::Leaf(id) => {
                if let Some(leaf) = self.leaf_arena.get(id) {
                    let _ = writeln!(out, "{}Leaf {:?}", indent, leaf.keys);
                }
            }
            NodeRef::Branch(id) => {
                if let Some(branch) = self.branch_arena.get(id) {
                    let _ = writeln!(out, "{}Branch {:?}", indent, branch.keys);
                    for &child in &branch.children {
                        self.render_node(child, depth + 1, out);
                    }
                }
            }
        }
    }

    /// Print the tree for debugging.
    pub fn print_tree(&self) {
        print!("{}", self.render());
    }

    /// Print the leaf chain as `[keys] -> [keys] -> ...`.
    pub fn print_node_chain(&self) {
        let chain: Vec<String> = self
            .leaf_chain()
            .map(|(_, leaf)| format!("{:?}", leaf.keys))
            .collect();
        println!("{}", chain.join(" -> "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(order: usize, n: i32) -> BPlusIndex<i32, i32> {
        let mut tree = BPlusIndex::new(order).unwrap();
        for i in 0..n {
            tree.insert(i, i).unwrap();
        }
        tree
    }

    #[test]
    fn test_valid_trees_pass() {
        for order in [3, 4, 5, 16] {
            let tree = filled(order, 200);
            assert_eq!(tree.check_invariants(), Ok(()));
            assert!(tree.validate_for_operation("probe").is_ok());
        }
    }

    #[test]
    fn test_detects_unsorted_leaf() {
        let mut tree = filled(4, 10);
        let leaf_id = tree.get_first_leaf_id().unwrap();
        tree.leaf_arena[leaf_id].keys.swap(0, 1);
        assert!(tree.check_invariants().unwrap_err().contains("ascending"));
    }

    #[test]
    fn test_detects_broken_leaf_chain() {
        let mut tree = filled(4, 10);
        let leaf_id = tree.get_first_leaf_id().unwrap();
        tree.leaf_arena[leaf_id].next = NULL_NODE;
        assert!(tree.check_invariants().unwrap_err().contains("leaf chain"));
    }

    #[test]
    fn test_detects_stale_parent() {
        let mut tree = filled(4, 10);
        let leaf_id = tree.get_first_leaf_id().unwrap();
        tree.leaf_arena[leaf_id].parent = NULL_NODE;
        assert!(tree.check_invariants().unwrap_err().contains("stale parent"));
    }

    #[test]
    fn test_detects_len_drift() {
        let mut tree = filled(4, 10);
        tree.len += 1;
        let err = tree.validate_for_operation("insert").unwrap_err();
        assert!(matches!(err, IndexError::DataIntegrityError(_)));
    }

    #[test]
    fn test_render_and_leaf_sizes() {
        let tree = filled(4, 4);
        assert_eq!(tree.render(), "Branch [2]\n  Leaf [0, 1]\n  Leaf [2, 3]\n");
        assert_eq!(tree.leaf_sizes(), vec![2, 2]);

        let empty: BPlusIndex<i32, ()> = BPlusIndex::new(4).unwrap();
        assert_eq!(empty.render(), "Leaf []\n");
    }
}
