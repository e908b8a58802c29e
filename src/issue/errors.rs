//! Issue model error types
//!
//! Error codes:
//! - CIVIC_INVALID_PRIORITY
//! - CIVIC_INVALID_STATUS

use thiserror::Error;

/// Errors raised while building issue model values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    /// Priority outside 1..=5
    #[error("invalid priority {0}: expected 1 (critical) to 5 (very low)")]
    InvalidPriority(u8),

    /// Unknown status string
    #[error("invalid status '{0}'")]
    InvalidStatus(String),
}

impl IssueError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            IssueError::InvalidPriority(_) => "CIVIC_INVALID_PRIORITY",
            IssueError::InvalidStatus(_) => "CIVIC_INVALID_STATUS",
        }
    }
}

/// Result type for issue model operations
pub type IssueResult<T> = Result<T, IssueError>;
