//! Store boundary error types
//!
//! Error codes:
//! - CIVIC_STORE_UNAVAILABLE
//! - CIVIC_STORE_LOCK_POISONED
//! - CIVIC_STORE_IDS_EXHAUSTED
//!
//! A missing record is not an error: `fetch` returns `Ok(None)` and
//! `mark_in_progress` returns `Ok(false)`.

use thiserror::Error;

/// Errors reported by an issue store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing system could not serve the request
    #[error("issue store unavailable: {0}")]
    Unavailable(String),

    /// An in-process store's lock was poisoned by a panicking writer
    #[error("issue store lock poisoned")]
    LockPoisoned,

    /// No id is left to assign to a new report
    #[error("issue store has no ids left to assign")]
    IdsExhausted,
}

impl StoreError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "CIVIC_STORE_UNAVAILABLE",
            StoreError::LockPoisoned => "CIVIC_STORE_LOCK_POISONED",
            StoreError::IdsExhausted => "CIVIC_STORE_IDS_EXHAUSTED",
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
