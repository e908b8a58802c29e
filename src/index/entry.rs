//! Lightweight index entries
//!
//! Entries copy only the fields their structure orders on. Full records
//! are resolved through the store by id.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::issue::{IssueId, IssueRecord, Priority};

/// Search tree entry, ordered and compared by id only
#[derive(Debug, Clone, Serialize)]
pub struct SearchEntry {
    /// Issue id, the ordering key
    pub id: IssueId,
    /// Category carried along for filtering without a store round trip
    pub category: Option<String>,
}

impl SearchEntry {
    /// Entry for a stored record
    pub fn from_record(record: &IssueRecord) -> Self {
        Self {
            id: record.id,
            category: Some(record.category.clone()),
        }
    }

    /// Key-only entry used to search the tree
    pub fn probe(id: IssueId) -> Self {
        Self { id, category: None }
    }
}

impl PartialEq for SearchEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SearchEntry {}

impl PartialOrd for SearchEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// Urgency queue entry
///
/// Ordered by priority (1 first), then submission time (oldest first), then
/// id so that no two distinct entries compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityEntry {
    /// Issue id
    pub id: IssueId,
    /// Triage priority
    pub priority: Priority,
    /// Submission time
    pub submitted_at: DateTime<Utc>,
}

impl PriorityEntry {
    /// Entry for a record, `None` if the record has no priority yet
    pub fn from_record(record: &IssueRecord) -> Option<Self> {
        record.priority.map(|priority| Self {
            id: record.id,
            priority,
            submitted_at: record.submitted_at,
        })
    }
}

impl PartialOrd for PriorityEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.submitted_at.cmp(&other.submitted_at))
            .then_with(|| self.id.cmp(&other.id))
    }
}
