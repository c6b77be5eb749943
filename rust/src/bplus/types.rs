//! Core types and data structures for BPlusIndex.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B+ tree engine.

use crate::compact_arena::{CompactArena, NodeId};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest supported order (maximum children per branch).
pub const MIN_ORDER: usize = 3;

/// Order used by `with_default_order` and `Default`.
pub const DEFAULT_ORDER: usize = 16;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// B+ tree ordered index.
///
/// All entries live in leaf nodes, which are chained left-to-right so range
/// scans walk the chain instead of re-descending the tree. Branch nodes only
/// carry separator keys.
///
/// # Examples
///
/// ```
/// use ordered_index::{BPlusIndex, IndexError};
///
/// let mut index = BPlusIndex::new(4).unwrap();
/// for i in 0..13 {
///     index.insert(i, i * 100).unwrap();
/// }
///
/// assert!(!index.is_leaf_root());
/// assert_eq!(index.get(&11), Some(&1100));
/// assert_eq!(index.insert(3, 0), Err(IndexError::KeyAlreadyExists));
/// assert_eq!(index.search(&13), Err(IndexError::KeyNotFound));
///
/// let scan: Vec<_> = index.range(4..7).map(|(k, _)| *k).collect();
/// assert_eq!(scan, [4, 5, 6]);
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(log n)
/// - **Lookup**: O(log n)
/// - **Deletion**: O(log n)
/// - **Range queries**: O(log n + k) where k is the number of items in range
///
/// # Order
///
/// `order` is the maximum number of children of a branch; every node holds at
/// most `order - 1` keys and a node reaching `order` keys is split at once.
#[derive(Debug, Clone)]
pub struct BPlusIndex<K, V> {
    /// Maximum number of children per branch node.
    pub(crate) order: usize,
    /// The root node of the tree.
    pub(crate) root: NodeRef,
    /// Number of stored entries.
    pub(crate) len: usize,
    pub(crate) leaf_arena: CompactArena<LeafNode<K, V>>,
    pub(crate) branch_arena: CompactArena<BranchNode<K>>,
}

/// Leaf node containing key-value pairs.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    /// Sorted list of keys.
    pub(crate) keys: Vec<K>,
    /// Values aligned with `keys`.
    pub(crate) values: Vec<V>,
    /// Next leaf node in the linked list (for range queries).
    pub(crate) next: NodeId,
    /// Owning branch, `NULL_NODE` for a root leaf.
    pub(crate) parent: NodeId,
}

/// Internal (branch) node containing separator keys and child links.
#[derive(Debug, Clone)]
pub struct BranchNode<K> {
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<K>,
    /// `keys.len() + 1` children; child `i` covers `[keys[i-1], keys[i])`.
    pub(crate) children: Vec<NodeRef>,
    /// Owning branch, `NULL_NODE` for the root.
    pub(crate) parent: NodeId,
}

// ============================================================================
// ENUMS
// ============================================================================

/// Node reference that can be either a leaf or branch node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Leaf(NodeId),
    Branch(NodeId),
}

impl NodeRef {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id) | NodeRef::Branch(id) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }
}
