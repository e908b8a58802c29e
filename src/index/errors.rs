//! Index error types
//!
//! Error codes:
//! - CIVIC_STORE_UNAVAILABLE / CIVIC_STORE_LOCK_POISONED /
//!   CIVIC_STORE_IDS_EXHAUSTED (from the store)
//! - CIVIC_EMPTY_CONTAINER (from the containers)
//! - CIVIC_INDEX_LOCK_POISONED
//! - CIVIC_CONFIG_INVALID
//!
//! Search misses and staleness are not errors.

use thiserror::Error;

use crate::store::StoreError;
use crate::structures::StructureError;

/// Errors raised by the issue index
#[derive(Debug, Error)]
pub enum IndexError {
    /// The authoritative store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A container contract was violated
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// A thread panicked while holding an index lock
    #[error("index {0} lock poisoned")]
    LockPoisoned(&'static str),

    /// Configuration rejected at load time
    #[error("invalid index configuration: {0}")]
    Config(String),
}

impl IndexError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        IndexError::Config(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::Store(e) => e.code(),
            IndexError::Structure(e) => e.code(),
            IndexError::LockPoisoned(_) => "CIVIC_INDEX_LOCK_POISONED",
            IndexError::Config(_) => "CIVIC_CONFIG_INVALID",
        }
    }

    /// True if the index cannot keep serving after this error.
    ///
    /// A store outage is transient: the previous snapshot stays published
    /// and the next read retries the rebuild.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, IndexError::Store(StoreError::Unavailable(_)))
    }
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        let err: IndexError = StoreError::Unavailable("db down".into()).into();
        assert_eq!(err.code(), "CIVIC_STORE_UNAVAILABLE");
        assert!(!err.is_fatal());

        let err: IndexError = StructureError::empty("peek").into();
        assert_eq!(err.code(), "CIVIC_EMPTY_CONTAINER");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_own_codes() {
        assert_eq!(IndexError::LockPoisoned("writer").code(), "CIVIC_INDEX_LOCK_POISONED");
        assert_eq!(IndexError::config("bad").code(), "CIVIC_CONFIG_INVALID");
        assert!(IndexError::config("bad").to_string().contains("bad"));
    }
}
