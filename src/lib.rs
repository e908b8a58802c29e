//! civic-index - in-memory indexing for municipal issue reports
//!
//! An AVL search tree and a min-heap urgency queue, kept fresh against an
//! authoritative issue store.

pub mod index;
pub mod issue;
pub mod observability;
pub mod store;
pub mod structures;
