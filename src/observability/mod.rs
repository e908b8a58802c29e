//! Observability for the issue index
//!
//! - Structured JSON log lines, one per event
//! - Counter-only metrics
//! - Begin/complete scopes around rebuilds
//!
//! Observability is read-only: nothing here feeds back into index decisions.
//!
//! ```ignore
//! use civic_index::observability::{IndexEvent, Logger, ObservationScope};
//!
//! let scope = ObservationScope::begin(IndexEvent::Refresh, &[]);
//! // ... rebuild ...
//! scope.complete(&[("issues", "42")]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::IndexEvent;
pub use logger::{Logger, Severity};
pub use metrics::{IndexMetrics, IndexMetricsSnapshot};
pub use scope::ObservationScope;
