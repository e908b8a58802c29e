//! Observable index events
//!
//! Every log line the index emits names one of these.

use std::fmt;

/// Events emitted by the issue index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexEvent {
    /// Full rebuild of both structures from the store
    Refresh,
    /// Rebuild triggered by a read past the staleness threshold
    LazyRefresh,
    /// Rebuild requested explicitly by a caller
    ForcedRefresh,
    /// Most urgent issue extracted and marked In Progress
    UrgentProcessed,
    /// Most urgent entry pointed at a record the store no longer has
    UrgentVanished,
    /// Index entry resolved to nothing in the store
    ResolveMiss,
    /// Configuration file loaded
    ConfigLoaded,
}

impl IndexEvent {
    /// Event name as written to the log
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexEvent::Refresh => "INDEX_REFRESH",
            IndexEvent::LazyRefresh => "INDEX_LAZY_REFRESH",
            IndexEvent::ForcedRefresh => "INDEX_FORCED_REFRESH",
            IndexEvent::UrgentProcessed => "INDEX_URGENT_PROCESSED",
            IndexEvent::UrgentVanished => "INDEX_URGENT_VANISHED",
            IndexEvent::ResolveMiss => "INDEX_RESOLVE_MISS",
            IndexEvent::ConfigLoaded => "INDEX_CONFIG_LOADED",
        }
    }
}

impl fmt::Display for IndexEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
