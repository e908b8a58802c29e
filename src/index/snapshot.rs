//! Immutable pair of index structures built from one store read
//!
//! A snapshot is never modified after publication. Rebuilds construct a new
//! snapshot beside the old one and swap the `Arc`, so readers holding the
//! old snapshot finish against a consistent pair.

use chrono::{DateTime, Duration, Utc};

use super::config::IndexConfig;
use super::entry::{PriorityEntry, SearchEntry};
use crate::issue::IssueRecord;
use crate::structures::{AvlTree, MinHeap};

/// Search tree, urgency queue and the time they were built
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    /// Every issue, ordered by id
    pub search_tree: AvlTree<SearchEntry>,
    /// Actionable, prioritised issues, most urgent at the root
    pub urgent_heap: MinHeap<PriorityEntry>,
    /// When the store was read; `None` until the first rebuild
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Number of rebuilds published before and including this one
    pub generation: u64,
}

impl IndexSnapshot {
    /// Snapshot of a never-built index
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds both structures from a full store read.
    ///
    /// The tree gets every record. The heap gets records whose status is
    /// actionable and that have a priority, heapified in one pass.
    pub fn build(
        records: &[IssueRecord],
        config: &IndexConfig,
        now: DateTime<Utc>,
        generation: u64,
    ) -> Self {
        let mut search_tree = AvlTree::new();
        let mut urgent = Vec::new();

        for record in records {
            search_tree.insert(SearchEntry::from_record(record));
            if config.is_actionable(record.status) {
                if let Some(entry) = PriorityEntry::from_record(record) {
                    urgent.push(entry);
                }
            }
        }

        Self {
            search_tree,
            urgent_heap: MinHeap::from_vec(urgent),
            refreshed_at: Some(now),
            generation,
        }
    }

    /// Copy of this snapshot that the next read treats as never built
    pub fn invalidated(&self) -> Self {
        Self {
            refreshed_at: None,
            ..self.clone()
        }
    }

    /// True if never built or older than `threshold` at `now`
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        match self.refreshed_at {
            None => true,
            Some(at) => now.signed_duration_since(at) > threshold,
        }
    }
}
