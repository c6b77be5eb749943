//! Compact arena storage shared by both index engines.
//!
//! Nodes are addressed by `NodeId` instead of owning pointers, so parent
//! back-links and leaf-chain links never form ownership cycles. Freed slots are
//! recycled through a free list.

use std::convert::TryFrom;
use std::ops::{Index, IndexMut};

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Reserved ID meaning "no node". Never handed out by `allocate`.
pub const NULL_NODE: NodeId = u32::MAX;

/// Statistics for a compact arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactArenaStats {
    pub total_slots: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub fragmentation: f64,
}

/// Slot arena with a free list for reuse.
#[derive(Debug, Clone)]
pub struct CompactArena<T> {
    storage: Vec<Option<T>>,
    free_list: Vec<usize>,
    live: usize,
}

impl<T> CompactArena<T> {
    /// Create a new empty compact arena
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Create a new compact arena with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = Some(item);
            free_index
        } else {
            self.storage.push(Some(item));
            self.storage.len() - 1
        };
        self.live += 1;

        // u32::MAX is reserved for NULL_NODE
        match NodeId::try_from(index) {
            Ok(id) if id != NULL_NODE => id,
            _ => panic!("arena exhausted the NodeId space at slot {}", index),
        }
    }

    /// Deallocate an item from the arena and return it
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T> {
        if id == NULL_NODE {
            return None;
        }

        let index = usize::try_from(id).ok()?;
        let item = self.storage.get_mut(index)?.take()?;
        self.free_list.push(index);
        self.live -= 1;
        Some(item)
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        if id == NULL_NODE {
            return None;
        }
        self.storage.get(usize::try_from(id).ok()?)?.as_ref()
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        if id == NULL_NODE {
            return None;
        }
        self.storage.get_mut(usize::try_from(id).ok()?)?.as_mut()
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get arena statistics
    pub fn stats(&self) -> CompactArenaStats {
        let free_count = self.free_list.len();
        let fragmentation = if self.storage.is_empty() {
            0.0
        } else {
            free_count as f64 / self.storage.len() as f64
        };

        CompactArenaStats {
            total_slots: self.storage.len(),
            allocated_count: self.live,
            free_count,
            fragmentation,
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Clear all items from the arena
    pub fn clear(&mut self) {
        self.storage.clear();
        self.free_list.clear();
        self.live = 0;
    }

    /// Get the number of free slots
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }
}

impl<T> Default for CompactArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Indexing a freed or reserved ID is a structural bug in the caller and aborts.
impl<T> Index<NodeId> for CompactArena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("dangling node id {}", id),
        }
    }
}

impl<T> IndexMut<NodeId> for CompactArena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.get_mut(id) {
            Some(item) => item,
            None => panic!("dangling node id {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_arena_basic_operations() {
        let mut arena = CompactArena::new();

        let id1 = arena.allocate(42);
        let id2 = arena.allocate(84);
        let id3 = arena.allocate(126);

        assert_eq!(arena.get(id1), Some(&42));
        assert_eq!(arena[id2], 84);
        assert_eq!(arena.get(id3), Some(&126));

        assert!(arena.contains(id1));
        assert!(!arena.contains(NULL_NODE));

        let stats = arena.stats();
        assert_eq!(stats.allocated_count, 3);
        assert_eq!(stats.free_count, 0);
    }

    #[test]
    fn test_deallocated_slot_is_reused() {
        let mut arena: CompactArena<String> = CompactArena::new();

        let id1 = arena.allocate("a".to_string());
        let id2 = arena.allocate("b".to_string());

        assert_eq!(arena.deallocate(id1), Some("a".to_string()));
        assert_eq!(arena.deallocate(id1), None);
        assert!(!arena.contains(id1));
        assert!(arena.contains(id2));

        let id3 = arena.allocate("c".to_string());
        assert_eq!(id3, id1);
        assert_eq!(arena.get(id3).map(String::as_str), Some("c"));

        let stats = arena.stats();
        assert_eq!(stats.allocated_count, 2);
        assert_eq!(stats.free_count, 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut arena = CompactArena::with_capacity(4);
        let id = arena.allocate(1u8);
        arena[id] = 2;
        assert_eq!(arena[id], 2);

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(id), None);
    }

    #[test]
    #[should_panic(expected = "dangling node id")]
    fn test_index_on_null_node_panics() {
        let arena: CompactArena<u8> = CompactArena::new();
        let _ = arena[NULL_NODE];
    }
}
