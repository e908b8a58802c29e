//! Generic in-memory containers used by the issue index
//!
//! - `AvlTree`: self-balancing search tree, O(log n) exact-match lookup
//! - `MinHeap`: array-backed priority queue, O(1) peek and O(log n) extract
//!
//! Both are plain single-owner values. Sharing between threads is handled
//! by the index snapshot that owns them, not by the containers.

mod avl;
mod errors;
mod heap;

pub use avl::AvlTree;
pub use errors::{StructureError, StructureResult};
pub use heap::MinHeap;
