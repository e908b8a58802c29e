//! In-process issue store
//!
//! Holds records in a `BTreeMap` behind an `RwLock`. Used by embedders
//! without a database and as the reference store in tests. Employee-side
//! edits (priority, status, bulk status) live here because the index
//! never mutates records itself.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::errors::{StoreError, StoreResult};
use super::IssueStore;
use crate::issue::{IssueId, IssueRecord, IssueStatus, Priority};

/// Fields an employee may change on review
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    /// New priority, `None` leaves it unchanged
    pub priority: Option<Priority>,
    /// New status, `None` leaves it unchanged
    pub status: Option<IssueStatus>,
}

/// `RwLock<BTreeMap>`-backed issue store
#[derive(Debug)]
pub struct MemoryIssueStore {
    records: RwLock<BTreeMap<IssueId, IssueRecord>>,
    next_id: AtomicU64,
}

impl Default for MemoryIssueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIssueStore {
    /// Creates an empty store; the first reported issue gets id 1
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Creates a store pre-loaded with `records`
    pub fn with_records(records: impl IntoIterator<Item = IssueRecord>) -> Self {
        let records: BTreeMap<IssueId, IssueRecord> =
            records.into_iter().map(|record| (record.id, record)).collect();
        let next_id = records
            .keys()
            .next_back()
            .map_or(1, |id| id.get().saturating_add(1));
        Self {
            records: RwLock::new(records),
            next_id: AtomicU64::new(next_id),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<IssueId, IssueRecord>>> {
        self.records.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<IssueId, IssueRecord>>> {
        self.records.write().map_err(|_| StoreError::LockPoisoned)
    }

    /// Records a new citizen report: next id, Pending, no priority.
    ///
    /// Ids are never reused. `u64::MAX` is never assigned here, so once the
    /// counter reaches it every report fails with `IdsExhausted`.
    pub fn report(
        &self,
        category: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> StoreResult<IssueRecord> {
        let id = self
            .next_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| next.checked_add(1))
            .map(IssueId)
            .map_err(|_| StoreError::IdsExhausted)?;
        let record = IssueRecord::new(id, category, submitted_at);
        self.write()?.insert(id, record.clone());
        Ok(record)
    }

    /// Inserts or replaces a record under its own id
    pub fn insert(&self, record: IssueRecord) -> StoreResult<Option<IssueRecord>> {
        self.next_id
            .fetch_max(record.id.get().saturating_add(1), Ordering::Relaxed);
        Ok(self.write()?.insert(record.id, record))
    }

    /// Removes a record, returning it if it existed
    pub fn remove(&self, id: IssueId) -> StoreResult<Option<IssueRecord>> {
        Ok(self.write()?.remove(&id))
    }

    /// Applies an employee review. Returns false if the record does not exist.
    pub fn update_issue(&self, id: IssueId, update: IssueUpdate) -> StoreResult<bool> {
        let mut records = self.write()?;
        let Some(record) = records.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(priority) = update.priority {
            record.priority = Some(priority);
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        Ok(true)
    }

    /// Sets `status` on every listed record that exists; returns how many changed
    pub fn bulk_update_status(&self, ids: &[IssueId], status: IssueStatus) -> StoreResult<usize> {
        let mut records = self.write()?;
        let mut updated = 0;
        for id in ids {
            if let Some(record) = records.get_mut(id) {
                record.status = status;
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Record count per status; statuses with no records are omitted
    pub fn status_counts(&self) -> StoreResult<BTreeMap<IssueStatus, usize>> {
        let mut counts = BTreeMap::new();
        for record in self.read()?.values() {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Records awaiting a priority, oldest first
    pub fn unreviewed(&self) -> StoreResult<Vec<IssueRecord>> {
        let mut records: Vec<IssueRecord> = self
            .read()?
            .values()
            .filter(|record| record.needs_review())
            .cloned()
            .collect();
        records.sort_by_key(|record| (record.submitted_at, record.id));
        Ok(records)
    }

    /// Number of records
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns true if the store holds no records
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }
}

impl IssueStore for MemoryIssueStore {
    fn load_all(&self) -> StoreResult<Vec<IssueRecord>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn fetch(&self, id: IssueId) -> StoreResult<Option<IssueRecord>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn mark_in_progress(&self, id: IssueId) -> StoreResult<bool> {
        self.update_issue(
            id,
            IssueUpdate {
                priority: None,
                status: Some(IssueStatus::InProgress),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 15, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_report_assigns_sequential_ids() {
        let store = MemoryIssueStore::new();
        let first = store.report("Roads", base_time()).unwrap();
        let second = store.report("Water", base_time()).unwrap();

        assert_eq!(first.id, IssueId(1));
        assert_eq!(second.id, IssueId(2));
        assert_eq!(first.status, IssueStatus::Pending);
        assert!(first.needs_review());
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_with_records_continues_numbering() {
        let store =
            MemoryIssueStore::with_records([IssueRecord::new(IssueId(40), "Parks", base_time())]);
        let next = store.report("Roads", base_time()).unwrap();
        assert_eq!(next.id, IssueId(41));
    }

    #[test]
    fn test_insert_bumps_next_id() {
        let store = MemoryIssueStore::new();
        store.insert(IssueRecord::new(IssueId(9), "Parks", base_time())).unwrap();
        assert_eq!(store.report("Roads", base_time()).unwrap().id, IssueId(10));
    }

    #[test]
    fn test_highest_id_does_not_overflow() {
        let store = MemoryIssueStore::new();
        store
            .insert(IssueRecord::new(IssueId(u64::MAX), "Parks", base_time()))
            .unwrap();
        assert!(store.fetch(IssueId(u64::MAX)).unwrap().is_some());

        let err = store.report("Roads", base_time()).unwrap_err();
        assert_eq!(err, StoreError::IdsExhausted);
        assert_eq!(err.code(), "CIVIC_STORE_IDS_EXHAUSTED");
        assert_eq!(store.len().unwrap(), 1);

        let highest = IssueRecord::new(IssueId(u64::MAX), "Parks", base_time());
        let preloaded = MemoryIssueStore::with_records([highest]);
        assert!(preloaded.report("Roads", base_time()).is_err());
    }

    #[test]
    fn test_last_assignable_id() {
        let near_end = IssueRecord::new(IssueId(u64::MAX - 2), "Parks", base_time());
        let store = MemoryIssueStore::with_records([near_end]);
        assert_eq!(store.report("Roads", base_time()).unwrap().id, IssueId(u64::MAX - 1));
        assert!(store.report("Roads", base_time()).is_err());
    }

    #[test]
    fn test_update_issue() {
        let store = MemoryIssueStore::new();
        let record = store.report("Roads", base_time()).unwrap();

        let changed = store
            .update_issue(
                record.id,
                IssueUpdate {
                    priority: Some(Priority::HIGH),
                    status: Some(IssueStatus::Assigned),
                },
            )
            .unwrap();
        assert!(changed);

        let stored = store.fetch(record.id).unwrap().unwrap();
        assert_eq!(stored.priority, Some(Priority::HIGH));
        assert_eq!(stored.status, IssueStatus::Assigned);

        assert!(!store.update_issue(IssueId(99), IssueUpdate::default()).unwrap());
    }

    #[test]
    fn test_mark_in_progress() {
        let store = MemoryIssueStore::new();
        let record = store.report("Water", base_time()).unwrap();

        assert!(store.mark_in_progress(record.id).unwrap());
        assert_eq!(store.fetch(record.id).unwrap().unwrap().status, IssueStatus::InProgress);
        assert!(!store.mark_in_progress(IssueId(404)).unwrap());
    }

    #[test]
    fn test_bulk_update_and_counts() {
        let store = MemoryIssueStore::new();
        let a = store.report("Roads", base_time()).unwrap();
        let b = store.report("Roads", base_time()).unwrap();
        store.report("Water", base_time()).unwrap();

        let updated = store
            .bulk_update_status(&[a.id, b.id, IssueId(77)], IssueStatus::Completed)
            .unwrap();
        assert_eq!(updated, 2);

        let counts = store.status_counts().unwrap();
        assert_eq!(counts.get(&IssueStatus::Completed), Some(&2));
        assert_eq!(counts.get(&IssueStatus::Pending), Some(&1));
        assert_eq!(counts.get(&IssueStatus::Cancelled), None);
    }

    #[test]
    fn test_unreviewed_oldest_first() {
        let store = MemoryIssueStore::new();
        let late = store.report("Roads", base_time() + Duration::hours(2)).unwrap();
        let early = store.report("Water", base_time()).unwrap();
        let reviewed = store.report("Parks", base_time()).unwrap();
        store
            .update_issue(
                reviewed.id,
                IssueUpdate {
                    priority: Some(Priority::LOW),
                    status: None,
                },
            )
            .unwrap();

        let ids: Vec<IssueId> = store.unreviewed().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[test]
    fn test_fetch_many_skips_missing() {
        let store = MemoryIssueStore::new();
        let a = store.report("Roads", base_time()).unwrap();
        let b = store.report("Water", base_time()).unwrap();
        store.remove(a.id).unwrap();

        let records = store.fetch_many(&[a.id, b.id]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, b.id);
    }
}
