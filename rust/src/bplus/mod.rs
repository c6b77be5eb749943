//! B+ tree engine.
//!
//! Entries live only in leaves; branches hold separators. The fan-out is set
//! per instance through `order`.

mod construction;
mod delete_operations;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod tree_structure;
mod types;
mod validation;

pub use construction::validation::{recommended_order, validate_order};
pub use iteration::{ItemIterator, KeyIterator, LeafChain, RangeIterator, ValueIterator};
pub use types::{BPlusIndex, BranchNode, LeafNode, NodeRef, DEFAULT_ORDER, MIN_ORDER};
