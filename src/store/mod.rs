//! Authoritative issue store boundary
//!
//! The index is derived state. It reads every record on rebuild, resolves
//! index hits one id at a time, and writes exactly one thing back: the
//! In Progress transition made by `process_most_urgent`.

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::{IssueUpdate, MemoryIssueStore};

use crate::issue::{IssueId, IssueRecord};

/// System of record the index is built from
pub trait IssueStore: Send + Sync {
    /// All current issue records, in any order
    fn load_all(&self) -> StoreResult<Vec<IssueRecord>>;

    /// One record by id, `None` if it no longer exists
    fn fetch(&self, id: IssueId) -> StoreResult<Option<IssueRecord>>;

    /// Records for `ids`, in the order given, skipping ids that no longer exist
    fn fetch_many(&self, ids: &[IssueId]) -> StoreResult<Vec<IssueRecord>> {
        let mut records = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(record) = self.fetch(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Sets the record's status to In Progress and persists it.
    ///
    /// Returns false if the record does not exist.
    fn mark_in_progress(&self, id: IssueId) -> StoreResult<bool>;
}
