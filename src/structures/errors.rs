//! Container error types
//!
//! Error codes:
//! - CIVIC_EMPTY_CONTAINER
//!
//! An empty container is a caller contract violation: check `is_empty()`
//! before `peek`, `extract_min`, `min` or `max`. A search miss is never an
//! error and is reported as `None`.

use thiserror::Error;

/// Errors raised by the tree and heap containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Operation needs at least one element
    #[error("{operation} called on an empty container")]
    EmptyContainer {
        /// Name of the rejected operation
        operation: &'static str,
    },
}

impl StructureError {
    pub(crate) fn empty(operation: &'static str) -> Self {
        StructureError::EmptyContainer { operation }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StructureError::EmptyContainer { .. } => "CIVIC_EMPTY_CONTAINER",
        }
    }
}

/// Result type for container operations
pub type StructureResult<T> = Result<T, StructureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(StructureError::empty("peek").code(), "CIVIC_EMPTY_CONTAINER");
    }

    #[test]
    fn test_error_display_names_operation() {
        let display = StructureError::empty("extract_min").to_string();
        assert!(display.contains("extract_min"));
        assert!(display.contains("empty"));
    }
}
