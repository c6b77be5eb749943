//! Construction and initialization logic for BPlusIndex and its nodes.
//!
//! The fan-out `order` is a per-instance parameter validated here, so indexes
//! with different orders can coexist in one process.

use super::types::{BPlusIndex, BranchNode, LeafNode, NodeRef, DEFAULT_ORDER, MIN_ORDER};
use crate::compact_arena::{CompactArena, NULL_NODE};
use crate::error::{IndexError, InitResult};

impl<K, V> BPlusIndex<K, V> {
    /// Create a B+ tree with the given order (maximum children per branch).
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidOrder`] when `order` is below
    /// [`MIN_ORDER`](super::types::MIN_ORDER).
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_index::BPlusIndex;
    ///
    /// let tree = BPlusIndex::<i32, String>::new(16).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BPlusIndex::<i32, String>::new(2).is_err());
    /// ```
    pub fn new(order: usize) -> InitResult<Self> {
        validation::validate_order(order)?;

        let mut leaf_arena = CompactArena::new();
        let root_id = leaf_arena.allocate(LeafNode::new(order));
        tracing::debug!(order, "created b+ index");

        Ok(Self {
            order,
            root: NodeRef::Leaf(root_id),
            len: 0,
            leaf_arena,
            branch_arena: CompactArena::new(),
        })
    }

    /// Create a B+ tree with [`DEFAULT_ORDER`](super::types::DEFAULT_ORDER).
    pub fn with_default_order() -> Self {
        match Self::new(DEFAULT_ORDER) {
            Ok(tree) => tree,
            Err(e) => unreachable!("default order rejected: {}", e),
        }
    }

    /// Create a B+ tree with an order suited to the expected number of entries.
    pub fn with_expected_len(expected_entries: usize) -> Self {
        match Self::new(validation::recommended_order(expected_entries)) {
            Ok(tree) => tree,
            Err(e) => unreachable!("recommended order rejected: {}", e),
        }
    }

    /// The order this tree was built with.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Maximum number of keys any node may hold.
    #[inline]
    pub(crate) fn max_keys(&self) -> usize {
        self.order - 1
    }

    /// Minimum number of keys a non-root node must hold.
    #[inline]
    pub(crate) fn min_keys(&self) -> usize {
        self.order.div_ceil(2) - 1
    }
}

impl<K, V> LeafNode<K, V> {
    /// Creates an empty, unlinked leaf sized for `order`.
    pub fn new(order: usize) -> Self {
        // One spare slot: a leaf briefly holds `order` keys before it splits.
        Self {
            keys: Vec::with_capacity(order),
            values: Vec::with_capacity(order),
            next: NULL_NODE,
            parent: NULL_NODE,
        }
    }
}

impl<K> BranchNode<K> {
    /// Creates an empty branch sized for `order`.
    pub fn new(order: usize) -> Self {
        Self {
            keys: Vec::with_capacity(order),
            children: Vec::with_capacity(order + 1),
            parent: NULL_NODE,
        }
    }
}

impl<K, V> Default for BPlusIndex<K, V> {
    /// Create a B+ tree with default order.
    fn default() -> Self {
        Self::with_default_order()
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;

    /// Validate that an order is usable for B+ tree nodes.
    pub fn validate_order(order: usize) -> InitResult<()> {
        if order < MIN_ORDER {
            Err(IndexError::invalid_order(order, MIN_ORDER))
        } else {
            Ok(())
        }
    }

    /// Get the recommended order for a given expected number of elements.
    ///
    /// Always returns at least [`MIN_ORDER`].
    pub fn recommended_order(expected_elements: usize) -> usize {
        if expected_elements < 100 {
            4
        } else if expected_elements < 10_000 {
            16
        } else if expected_elements < 1_000_000 {
            32
        } else {
            64
        }
    }
}
