//! Red-Black tree ordered index.
//!
//! A binary search tree kept within `2 * log2(n + 1)` height by the red/black
//! coloring rules. Nodes live in a [`CompactArena`] and refer to each other by
//! [`NodeId`]; `NULL_NODE` plays the role of the black sentinel leaf, so color
//! reads on a missing child never need a special case.

mod fixup;
mod iteration;
mod validation;

pub use iteration::{Iter, Keys, Range, Values};

use crate::compact_arena::{CompactArena, NodeId, NULL_NODE};
use crate::error::{IndexError, KeyResult, ModifyResult};
use std::cmp::Ordering;

/// Node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Which in-order neighbour replaces a deleted node that has two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalStrategy {
    /// Minimum of the right subtree.
    #[default]
    Successor,
    /// Maximum of the left subtree.
    Predecessor,
}

/// Child direction. Every rebalancing case has a mirror image selected by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RbNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) parent: NodeId,
}

/// Ordered map backed by a Red-Black tree.
///
/// Inserting an existing key replaces its value in place; removing an absent
/// key is a no-op.
///
/// # Examples
///
/// ```
/// use ordered_index::RedBlackIndex;
///
/// let mut index = RedBlackIndex::new();
/// index.insert(10, "ten");
/// index.insert(20, "twenty");
/// index.insert(5, "five");
///
/// assert_eq!(index.get(&20), Some(&"twenty"));
/// assert_eq!(index.remove(&10), Some("ten"));
/// assert_eq!(index.keys().copied().collect::<Vec<_>>(), vec![5, 20]);
/// ```
#[derive(Debug, Clone)]
pub struct RedBlackIndex<K, V> {
    pub(crate) nodes: CompactArena<RbNode<K, V>>,
    pub(crate) root: NodeId,
    strategy: RemovalStrategy,
}

impl<K, V> Default for RedBlackIndex<K, V> {
    fn default() -> Self {
        Self::with_strategy(RemovalStrategy::default())
    }
}

impl<K, V> RedBlackIndex<K, V> {
    /// Create an empty index that removes two-child nodes via their successor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with an explicit removal strategy.
    pub fn with_strategy(strategy: RemovalStrategy) -> Self {
        Self {
            nodes: CompactArena::new(),
            root: NULL_NODE,
            strategy,
        }
    }

    /// The configured removal strategy.
    pub fn strategy(&self) -> RemovalStrategy {
        self.strategy
    }

    /// Number of key-value pairs.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root == NULL_NODE
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        tracing::debug!(entries = self.len(), "clearing red-black index");
        self.nodes.clear();
        self.root = NULL_NODE;
    }

    // ============================================================================
    // SENTINEL-AWARE ACCESSORS
    // ============================================================================

    /// Color of a node; the sentinel is always black.
    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.nodes.get(id).map_or(Color::Black, |node| node.color)
    }

    /// Recolor a real node. Recoloring the sentinel is ignored so it stays black.
    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.color = color;
        }
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.nodes.get(id).map_or(NULL_NODE, |node| node.parent)
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = parent;
        }
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, side: Side) -> NodeId {
        match (self.nodes.get(id), side) {
            (Some(node), Side::Left) => node.left,
            (Some(node), Side::Right) => node.right,
            (None, _) => NULL_NODE,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, id: NodeId, side: Side, child: NodeId) {
        let node = &mut self.nodes[id];
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    /// Walk from `id` as far as possible toward `side`.
    pub(crate) fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        loop {
            let next = self.child(id, side);
            if next == NULL_NODE {
                return id;
            }
            id = next;
        }
    }

    /// In-order neighbour of `id` in the direction of `side` (Right = successor).
    pub(crate) fn neighbour(&self, id: NodeId, side: Side) -> NodeId {
        let down = self.child(id, side);
        if down != NULL_NODE {
            return self.extreme(down, side.opposite());
        }

        let mut current = id;
        let mut parent = self.parent(current);
        while parent != NULL_NODE && self.child(parent, side) == current {
            current = parent;
            parent = self.parent(parent);
        }
        parent
    }

    // ============================================================================
    // GET OPERATIONS
    // ============================================================================

    /// Returns the first key-value pair in the index.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry(self.extreme(self.root, Side::Left))
    }

    /// Returns the last key-value pair in the index.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.entry(self.extreme(self.root, Side::Right))
    }

    #[inline]
    pub(crate) fn entry(&self, id: NodeId) -> Option<(&K, &V)> {
        self.nodes.get(id).map(|node| (&node.key, &node.value))
    }
}

impl<K: Ord, V> RedBlackIndex<K, V> {
    /// Locate the node holding `key`, or `NULL_NODE`.
    pub(crate) fn find_node(&self, key: &K) -> NodeId {
        let mut current = self.root;
        while let Some(node) = self.nodes.get(current) {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return current,
            };
        }
        NULL_NODE
    }

    /// Look up `key`, reporting a miss as [`IndexError::KeyNotFound`].
    pub fn search(&self, key: &K) -> KeyResult<(&K, &V)> {
        self.entry(self.find_node(key)).ok_or(IndexError::KeyNotFound)
    }

    /// Get a reference to the value associated with a key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.nodes.get(self.find_node(key)).map(|node| &node.value)
    }

    /// Get a mutable reference to the value associated with a key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find_node(key);
        self.nodes.get_mut(id).map(|node| &mut node.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_node(key) != NULL_NODE
    }

    // ============================================================================
    // INSERT OPERATIONS
    // ============================================================================

    /// Insert a key-value pair.
    ///
    /// Returns the previous value when the key was already present; in that case
    /// the tree shape and colors are left untouched.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = NULL_NODE;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(node) = self.nodes.get_mut(current) {
            parent = current;
            match key.cmp(&node.key) {
                Ordering::Less => {
                    side = Side::Left;
                    current = node.left;
                }
                Ordering::Greater => {
                    side = Side::Right;
                    current = node.right;
                }
                Ordering::Equal => return Some(std::mem::replace(&mut node.value, value)),
            }
        }

        let new_id = self.nodes.allocate(RbNode {
            key,
            value,
            color: Color::Red,
            left: NULL_NODE,
            right: NULL_NODE,
            parent,
        });

        if parent == NULL_NODE {
            self.root = new_id;
        } else {
            self.set_child(parent, side, new_id);
        }

        self.insert_fixup(new_id);
        None
    }

    // ============================================================================
    // DELETE OPERATIONS
    // ============================================================================

    /// Remove a key, returning its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove a key, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.find_node(key);
        if id == NULL_NODE {
            return None;
        }
        Some(self.delete_node(id))
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
        if self.root == NULL_NODE {
            return None;
        }
        let id = self.extreme(self.root, Side::Left);
        Some(self.delete_node(id))
    }

    /// Remove and return the largest entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        if self.root == NULL_NODE {
            return None;
        }
        let id = self.extreme(self.root, Side::Right);
        Some(self.delete_node(id))
    }

    /// Unlink node `z` and restore the coloring rules.
    fn delete_node(&mut self, z: NodeId) -> (K, V) {
        let mut removed_color = self.color(z);
        let x;
        let x_parent;

        let z_left = self.child(z, Side::Left);
        let z_right = self.child(z, Side::Right);

        if z_left == NULL_NODE {
            x = z_right;
            x_parent = self.parent(z);
            self.transplant(z, z_right);
        } else if z_right == NULL_NODE {
            x = z_left;
            x_parent = self.parent(z);
            self.transplant(z, z_left);
        } else {
            // `into` is the subtree the replacement comes from, `toward` the
            // direction walked inside it.
            let (into, toward) = match self.strategy {
                RemovalStrategy::Successor => (Side::Right, Side::Left),
                RemovalStrategy::Predecessor => (Side::Left, Side::Right),
            };

            let y = self.extreme(self.child(z, into), toward);
            removed_color = self.color(y);
            x = self.child(y, into);

            if self.parent(y) == z {
                x_parent = y;
            } else {
                x_parent = self.parent(y);
                self.transplant(y, x);
                let z_into = self.child(z, into);
                self.set_child(y, into, z_into);
                self.set_parent(z_into, y);
            }

            self.transplant(z, y);
            let z_toward = self.child(z, toward);
            self.set_child(y, toward, z_toward);
            self.set_parent(z_toward, y);
            let z_color = self.color(z);
            self.set_color(y, z_color);
        }

        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }

        match self.nodes.deallocate(z) {
            Some(node) => (node.key, node.value),
            None => unreachable!("node {} was unlinked twice", z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_search_delete_scenario() {
        let mut tree = RedBlackIndex::new();
        tree.insert(10, "value10");
        tree.insert(20, "value20");
        tree.insert(5, "value5");

        assert_eq!(tree.search(&10), Ok((&10, &"value10")));
        assert_eq!(tree.entry(tree.root).map(|(k, _)| *k), Some(10));
        assert_eq!(tree.color(tree.root), Color::Black);
        tree.check_invariants().unwrap();

        assert_eq!(tree.remove(&10), Some("value10"));
        tree.check_invariants().unwrap();
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![5, 20]);
    }

    #[test]
    fn test_duplicate_insert_updates_in_place() {
        let mut tree = RedBlackIndex::new();
        assert_eq!(tree.insert(7, "first"), None);
        let root_before = tree.root;
        assert_eq!(tree.insert(7, "second"), Some("first"));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root, root_before);
        assert_eq!(tree.get(&7), Some(&"second"));
    }

    #[test]
    fn test_missing_keys_are_not_errors_for_remove() {
        let mut tree: RedBlackIndex<i32, ()> = RedBlackIndex::new();
        assert_eq!(tree.remove(&3), None);
        assert_eq!(tree.search(&3), Err(IndexError::KeyNotFound));
        assert_eq!(tree.try_remove(&3), Err(IndexError::KeyNotFound));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_sequential_inserts_stay_balanced() {
        let mut tree = RedBlackIndex::new();
        for i in 0..17 {
            tree.insert(i, ());
            tree.check_invariants().unwrap();
        }

        assert!(tree.contains_key(&10));
        tree.remove(&11);
        tree.check_invariants().unwrap();
        assert_eq!(tree.len(), 16);
        assert!(tree.height() <= 2 * 5);
    }

    #[test]
    fn test_root_removal_down_to_empty() {
        for strategy in [RemovalStrategy::Successor, RemovalStrategy::Predecessor] {
            let mut tree = RedBlackIndex::with_strategy(strategy);
            for i in 0..32 {
                tree.insert(i, i * 2);
            }
            while let Some((&root_key, _)) = tree.entry(tree.root) {
                assert_eq!(tree.remove(&root_key), Some(root_key * 2));
                tree.check_invariants().unwrap();
            }
            assert!(tree.is_empty());
            assert_eq!(tree.nodes.len(), 0);
        }
    }

    #[test]
    fn test_first_last_and_pops() {
        let mut tree = RedBlackIndex::new();
        for k in [8, 3, 12, 1, 5] {
            tree.insert(k, k.to_string());
        }
        assert_eq!(tree.first(), Some((&1, &"1".to_string())));
        assert_eq!(tree.last(), Some((&12, &"12".to_string())));

        assert_eq!(tree.pop_first(), Some((1, "1".to_string())));
        assert_eq!(tree.pop_last(), Some((12, "12".to_string())));
        tree.check_invariants().unwrap();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_get_mut_and_clear() {
        let mut tree = RedBlackIndex::new();
        tree.insert("a", 1);
        if let Some(v) = tree.get_mut(&"a") {
            *v += 10;
        }
        assert_eq!(tree.get(&"a"), Some(&11));

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.first(), None);
    }
}
