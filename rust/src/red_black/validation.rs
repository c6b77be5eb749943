//! Invariant checking and debugging output for RedBlackIndex.

use super::{Color, RedBlackIndex, Side};
use crate::compact_arena::{NodeId, NULL_NODE};
use crate::error::{IndexError, IndexResult};
use std::fmt::{Debug, Write};

impl<K: Ord, V> RedBlackIndex<K, V> {
    /// Check the coloring, ordering and linkage rules.
    ///
    /// Returns the first violation found, described in words.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.root == NULL_NODE {
            if !self.nodes.is_empty() {
                return Err(format!(
                    "empty root but {} nodes still allocated",
                    self.nodes.len()
                ));
            }
            return Ok(());
        }

        if self.color(self.root) != Color::Black {
            return Err("root is red".to_string());
        }
        if self.parent(self.root) != NULL_NODE {
            return Err("root has a parent link".to_string());
        }

        let mut reachable = 0;
        self.check_subtree(self.root, None, None, &mut reachable)?;

        if reachable != self.nodes.len() {
            return Err(format!(
                "{} nodes reachable but {} allocated",
                reachable,
                self.nodes.len()
            ));
        }
        Ok(())
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

    /// Black-height of the subtree at `id`, counting the sentinel as 1.
    fn check_subtree(
        &self,
        id: NodeId,
        min_key: Option<&K>,
        max_key: Option<&K>,
        reachable: &mut usize,
    ) -> Result<usize, String> {
        let Some(node) = self.nodes.get(id) else {
            return Ok(1);
        };
        *reachable += 1;

        if min_key.is_some_and(|min| node.key <= *min) {
            return Err(format!("node {} breaks ordering with its lower bound", id));
        }
        if max_key.is_some_and(|max| node.key >= *max) {
            return Err(format!("node {} breaks ordering with its upper bound", id));
        }

        for side in [Side::Left, Side::Right] {
            let child = self.child(id, side);
            if child == NULL_NODE {
                continue;
            }
            if self.parent(child) != id {
                return Err(format!(
                    "{:?} child {} of {} has a stale parent link",
                    side, child, id
                ));
            }
            if node.color == Color::Red && self.color(child) == Color::Red {
                return Err(format!("red node {} has red child {}", id, child));
            }
        }

        let left = self.check_subtree(node.left, min_key, Some(&node.key), reachable)?;
        let right = self.check_subtree(node.right, Some(&node.key), max_key, reachable)?;
        if left != right {
            return Err(format!(
                "black-height mismatch under node {}: left {} vs right {}",
                id, left, right
            ));
        }

        Ok(left + usize::from(node.color == Color::Black))
    }
}

impl<K, V> RedBlackIndex<K, V> {
    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, id: NodeId) -> usize {
        match self.nodes.get(id) {
            Some(node) => {
                1 + self
                    .subtree_height(node.left)
                    .max(self.subtree_height(node.right))
            }
            None => 0,
        }
    }

    /// Black nodes on the leftmost path, root included.
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut current = self.root;
        while let Some(node) = self.nodes.get(current) {
            count += usize::from(node.color == Color::Black);
            current = node.left;
        }
        count
    }
}

impl<K: Debug, V> RedBlackIndex<K, V> {
    /// Render the tree sideways: right subtree above, left below, red nodes tagged.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.root == NULL_NODE {
            out.push_str("Empty tree\n");
        } else {
            self.render_node(self.root, 0, &mut out);
        }
        out
    }

    fn render_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        self.render_node(node.right, depth + 1, out);
        let tag = match node.color {
            Color::Red => "R",
            Color::Black => "B",
        };
        let _ = writeln!(out, "{}{:?}[{}]", "    ".repeat(depth), node.key, tag);
        self.render_node(node.left, depth + 1, out);
    }

    /// Print the tree for debugging.
    pub fn print_tree(&self) {
        print!("{}", self.render());
    }
}
