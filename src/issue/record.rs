//! Issue record and its field types
//!
//! These mirror the columns the authoritative store exposes to the index:
//! identifier, optional priority, status, submission time and category.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{IssueError, IssueResult};

/// Issue identifier assigned by the authoritative store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub u64);

impl IssueId {
    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for IssueId {
    fn from(value: u64) -> Self {
        IssueId(value)
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Triage priority, 1 (critical) to 5 (very low)
///
/// Lower values are more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Water main break, electrical hazard
    pub const CRITICAL: Priority = Priority(1);
    /// Major pothole, traffic light out
    pub const HIGH: Priority = Priority(2);
    /// Streetlight out
    pub const MEDIUM: Priority = Priority(3);
    /// Minor cosmetic issues
    pub const LOW: Priority = Priority(4);
    /// Suggestions, non-urgent
    pub const VERY_LOW: Priority = Priority(5);

    /// Creates a priority, rejecting values outside 1..=5
    pub fn new(level: u8) -> IssueResult<Self> {
        if (1..=5).contains(&level) {
            Ok(Priority(level))
        } else {
            Err(IssueError::InvalidPriority(level))
        }
    }

    /// Numeric level
    pub fn level(self) -> u8 {
        self.0
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Critical",
            2 => "High",
            3 => "Medium",
            4 => "Low",
            _ => "Very Low",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = IssueError;

    fn try_from(level: u8) -> IssueResult<Self> {
        Priority::new(level)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

/// Lifecycle status of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    /// Reported, awaiting work
    Pending,
    /// Assigned to a crew
    Assigned,
    /// Being worked on
    #[serde(rename = "In Progress")]
    InProgress,
    /// Resolved
    Completed,
    /// Withdrawn or rejected
    Cancelled,
}

impl IssueStatus {
    /// Every status, in lifecycle order
    pub const ALL: [IssueStatus; 5] = [
        IssueStatus::Pending,
        IssueStatus::Assigned,
        IssueStatus::InProgress,
        IssueStatus::Completed,
        IssueStatus::Cancelled,
    ];

    /// The string form used by the store
    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Pending => "Pending",
            IssueStatus::Assigned => "Assigned",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Completed => "Completed",
            IssueStatus::Cancelled => "Cancelled",
        }
    }

    /// Completed and cancelled issues need no further work
    pub fn is_closed(self) -> bool {
        matches!(self, IssueStatus::Completed | IssueStatus::Cancelled)
    }
}

impl FromStr for IssueStatus {
    type Err = IssueError;

    fn from_str(s: &str) -> IssueResult<Self> {
        IssueStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| IssueError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issue as held by the authoritative store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Store-assigned identifier
    pub id: IssueId,
    /// Triage priority; `None` until an employee reviews the issue
    pub priority: Option<Priority>,
    /// Lifecycle status
    pub status: IssueStatus,
    /// When the citizen submitted the report
    pub submitted_at: DateTime<Utc>,
    /// Category chosen by the reporter (roads, water, ...)
    pub category: String,
}

impl IssueRecord {
    /// A freshly reported issue: pending, not yet prioritised
    pub fn new(id: IssueId, category: impl Into<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            priority: None,
            status: IssueStatus::Pending,
            submitted_at,
            category: category.into(),
        }
    }

    /// Sets the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the status
    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    /// True until an employee assigns a priority
    pub fn needs_review(&self) -> bool {
        self.priority.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_priority_bounds() {
        assert!(Priority::new(0).is_err());
        assert_eq!(Priority::new(1), Ok(Priority::CRITICAL));
        assert_eq!(Priority::new(5), Ok(Priority::VERY_LOW));
        assert_eq!(Priority::new(6), Err(IssueError::InvalidPriority(6)));
        assert_eq!(IssueError::InvalidPriority(6).code(), "CIVIC_INVALID_PRIORITY");
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(Priority::CRITICAL.label(), "Critical");
        assert_eq!(Priority::MEDIUM.label(), "Medium");
        assert_eq!(Priority::VERY_LOW.to_string(), "5 (Very Low)");
    }

    #[test]
    fn test_status_round_trips_store_strings() {
        for status in IssueStatus::ALL {
            assert_eq!(status.as_str().parse::<IssueStatus>(), Ok(status));
        }
        assert_eq!(
            "Closed".parse::<IssueStatus>(),
            Err(IssueError::InvalidStatus("Closed".to_string()))
        );
    }

    #[test]
    fn test_record_json_uses_store_strings() {
        let submitted = Utc.with_ymd_and_hms(2025, 10, 15, 9, 30, 0).unwrap();
        let record = IssueRecord::new(IssueId(7), "Roads", submitted)
            .with_priority(Priority::HIGH)
            .with_status(IssueStatus::InProgress);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["priority"], 2);
        assert_eq!(json["status"], "In Progress");

        let parsed: IssueRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_record_json_rejects_bad_priority() {
        let json = r#"{"id":1,"priority":9,"status":"Pending",
            "submitted_at":"2025-10-15T09:30:00Z","category":"Water"}"#;
        assert!(serde_json::from_str::<IssueRecord>(json).is_err());
    }

    #[test]
    fn test_new_record_needs_review() {
        let record = IssueRecord::new(IssueId(1), "Water", Utc::now());
        assert!(record.needs_review());
        assert_eq!(record.status, IssueStatus::Pending);
        assert!(!record.status.is_closed());
        assert!(IssueStatus::Cancelled.is_closed());
    }
}
