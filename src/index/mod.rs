//! Issue index subsystem
//!
//! Read-optimised secondary views over the issue store, rebuilt from it
//! wholesale.
//!
//! # Design Principles
//!
//! - Derived state: the store stays the source of truth
//! - In-memory only: nothing is persisted
//! - Rebuild and swap: readers always see one consistent snapshot
//!
//! # Invariants
//!
//! - Search tree and urgency queue come from the same store read
//! - Reads rebuild first when the snapshot is older than the threshold
//! - The urgency queue only holds actionable issues with a priority

mod clock;
mod config;
mod entry;
mod errors;
mod manager;
mod snapshot;
mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::IndexConfig;
pub use entry::{PriorityEntry, SearchEntry};
pub use errors::{IndexError, IndexResult};
pub use manager::IssueIndex;
pub use snapshot::IndexSnapshot;
pub use stats::{theoretical_height, IndexStatistics};
