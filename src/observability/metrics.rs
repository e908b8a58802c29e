//! Index counters
//!
//! - Counters only, monotonic, reset on process start
//! - Relaxed atomics: values are exact per counter, not across counters
//! - Passive: nothing in the index reads them to make a decision

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one index instance
#[derive(Debug, Default)]
pub struct IndexMetrics {
    refreshes: AtomicU64,
    lazy_refreshes: AtomicU64,
    forced_refreshes: AtomicU64,
    refresh_failures: AtomicU64,
    search_hits: AtomicU64,
    search_misses: AtomicU64,
    urgent_processed: AtomicU64,
    resolve_misses: AtomicU64,
}

impl IndexMetrics {
    /// Creates a registry with every counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// A full rebuild was published
    pub fn increment_refreshes(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    /// A read found the index stale
    pub fn increment_lazy_refreshes(&self) {
        self.lazy_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    /// A caller forced a rebuild
    pub fn increment_forced_refreshes(&self) {
        self.forced_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    /// A rebuild failed to read the store
    pub fn increment_refresh_failures(&self) {
        self.refresh_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// `fast_search` found the id in the tree
    pub fn increment_search_hits(&self) {
        self.search_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// `fast_search` did not find the id in the tree
    pub fn increment_search_misses(&self) {
        self.search_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// An urgent issue was moved to In Progress
    pub fn increment_urgent_processed(&self) {
        self.urgent_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// An index entry had no matching store record
    pub fn increment_resolve_misses(&self) {
        self.add_resolve_misses(1);
    }

    /// `n` index entries had no matching store record
    pub fn add_resolve_misses(&self, n: u64) {
        self.resolve_misses.fetch_add(n, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> IndexMetricsSnapshot {
        IndexMetricsSnapshot {
            refreshes: self.refreshes.load(Ordering::Relaxed),
            lazy_refreshes: self.lazy_refreshes.load(Ordering::Relaxed),
            forced_refreshes: self.forced_refreshes.load(Ordering::Relaxed),
            refresh_failures: self.refresh_failures.load(Ordering::Relaxed),
            search_hits: self.search_hits.load(Ordering::Relaxed),
            search_misses: self.search_misses.load(Ordering::Relaxed),
            urgent_processed: self.urgent_processed.load(Ordering::Relaxed),
            resolve_misses: self.resolve_misses.load(Ordering::Relaxed),
        }
    }

    /// Counters as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_default()
    }
}

/// Copy of `IndexMetrics` at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexMetricsSnapshot {
    pub refreshes: u64,
    pub lazy_refreshes: u64,
    pub forced_refreshes: u64,
    pub refresh_failures: u64,
    pub search_hits: u64,
    pub search_misses: u64,
    pub urgent_processed: u64,
    pub resolve_misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        assert_eq!(IndexMetrics::new().snapshot(), IndexMetricsSnapshot::default());
    }

    #[test]
    fn test_increments() {
        let metrics = IndexMetrics::new();
        metrics.increment_refreshes();
        metrics.increment_refreshes();
        metrics.increment_lazy_refreshes();
        metrics.increment_forced_refreshes();
        metrics.increment_search_hits();
        metrics.increment_search_misses();
        metrics.increment_search_misses();
        metrics.increment_urgent_processed();
        metrics.increment_resolve_misses();
        metrics.add_resolve_misses(3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.refreshes, 2);
        assert_eq!(snapshot.lazy_refreshes, 1);
        assert_eq!(snapshot.forced_refreshes, 1);
        assert_eq!(snapshot.search_hits, 1);
        assert_eq!(snapshot.search_misses, 2);
        assert_eq!(snapshot.urgent_processed, 1);
        assert_eq!(snapshot.resolve_misses, 4);
        assert_eq!(snapshot.refresh_failures, 0);
    }

    #[test]
    fn test_to_json() {
        let metrics = IndexMetrics::new();
        metrics.increment_refresh_failures();
        metrics.increment_resolve_misses();

        let parsed: serde_json::Value = serde_json::from_str(&metrics.to_json()).unwrap();
        assert_eq!(parsed["refresh_failures"], 1);
        assert_eq!(parsed["resolve_misses"], 1);
        assert_eq!(parsed["refreshes"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(IndexMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.increment_search_hits();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.snapshot().search_hits, 2000);
    }
}
