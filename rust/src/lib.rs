//! In-memory ordered indexes: a Red-Black tree and a B+ tree.
//!
//! Both engines map totally ordered keys to opaque values and share one
//! contract, [`OrderedIndex`]: point lookup, upsert, delete, and in-order
//! iteration. Nodes of either tree live in a [`CompactArena`] and link to each
//! other by [`NodeId`], so parent back-links and the B+ leaf chain need no
//! shared ownership.
//!
//! ```
//! use ordered_index::{BPlusIndex, OrderedIndex, RedBlackIndex};
//!
//! fn load<I: OrderedIndex<u32, &'static str>>(index: &mut I) {
//!     index.upsert(3, "c");
//!     index.upsert(1, "a");
//!     index.upsert(2, "b");
//! }
//!
//! let mut rb = RedBlackIndex::new();
//! let mut bp = BPlusIndex::new(4).unwrap();
//! load(&mut rb);
//! load(&mut bp);
//!
//! let rb_keys: Vec<_> = OrderedIndex::iter(&rb).map(|(k, _)| *k).collect();
//! let bp_keys: Vec<_> = OrderedIndex::iter(&bp).map(|(k, _)| *k).collect();
//! assert_eq!(rb_keys, [1, 2, 3]);
//! assert_eq!(rb_keys, bp_keys);
//! ```

mod compact_arena;
mod error;

pub mod bplus;
pub mod red_black;

pub use bplus::BPlusIndex;
pub use compact_arena::{CompactArena, CompactArenaStats, NodeId, NULL_NODE};
pub use error::{
    IndexError, IndexResult, IndexResultExt, InitResult, KeyResult, ModifyResult,
};
pub use red_black::{Color, RedBlackIndex, RemovalStrategy};

/// Operations shared by every ordered index in this crate.
///
/// Insertion through the trait always has map semantics: an existing key has
/// its value replaced.
pub trait OrderedIndex<K: Ord, V> {
    /// In-order iterator over entries.
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Insert or overwrite, returning the previous value.
    fn upsert(&mut self, key: K, value: V) -> Option<V>;

    /// Look up `key`; a miss is [`IndexError::KeyNotFound`].
    fn search(&self, key: &K) -> KeyResult<(&K, &V)>;

    /// Remove `key`, returning its value. Absent keys are a no-op.
    fn delete(&mut self, key: &K) -> Option<V>;

    fn iter(&self) -> Self::Iter<'_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check every structural invariant, describing the first violation.
    fn check_invariants(&self) -> Result<(), String>;
}

impl<K: Ord, V> OrderedIndex<K, V> for RedBlackIndex<K, V> {
    type Iter<'a>
        = red_black::Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn upsert(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    fn search(&self, key: &K) -> KeyResult<(&K, &V)> {
        RedBlackIndex::search(self, key)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        self.remove(key)
    }

    fn iter(&self) -> Self::Iter<'_> {
        RedBlackIndex::iter(self)
    }

    fn len(&self) -> usize {
        RedBlackIndex::len(self)
    }

    fn check_invariants(&self) -> Result<(), String> {
        RedBlackIndex::check_invariants(self)
    }
}

impl<K: Ord + Clone, V> OrderedIndex<K, V> for BPlusIndex<K, V> {
    type Iter<'a>
        = bplus::ItemIterator<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn upsert(&mut self, key: K, value: V) -> Option<V> {
        BPlusIndex::upsert(self, key, value)
    }

    fn search(&self, key: &K) -> KeyResult<(&K, &V)> {
        BPlusIndex::search(self, key)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        self.remove(key)
    }

    fn iter(&self) -> Self::Iter<'_> {
        BPlusIndex::iter(self)
    }

    fn len(&self) -> usize {
        BPlusIndex::len(self)
    }

    fn check_invariants(&self) -> Result<(), String> {
        BPlusIndex::check_invariants(self)
    }
}
