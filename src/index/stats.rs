//! Diagnostic statistics over one snapshot
//!
//! Passive figures for dashboards. Nothing in the index reads them back.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::snapshot::IndexSnapshot;

/// Shape of the index at one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStatistics {
    /// Issues in the search tree
    pub total_issues_indexed: usize,
    /// Issues in the urgency queue
    pub urgent_issues_queued: usize,
    /// Height of the search tree
    pub tree_height: u32,
    /// When the snapshot was built
    pub last_refresh_time: Option<DateTime<Utc>>,
    /// Rebuild generation of the snapshot
    pub generation: u64,
    /// ceil(log2(n + 1)), the height of a perfectly balanced tree
    pub theoretical_height: u32,
    /// Tree height is at most one above the theoretical height
    pub is_well_balanced: bool,
    /// Average linear-scan probes (n / 2) per tree level
    pub search_efficiency_gain: f64,
}

impl IndexStatistics {
    /// Computes statistics for `snapshot`
    pub fn from_snapshot(snapshot: &IndexSnapshot) -> Self {
        let total = snapshot.search_tree.len();
        let height = snapshot.search_tree.height();
        let theoretical = theoretical_height(total);

        Self {
            total_issues_indexed: total,
            urgent_issues_queued: snapshot.urgent_heap.len(),
            tree_height: height,
            last_refresh_time: snapshot.refreshed_at,
            generation: snapshot.generation,
            theoretical_height: theoretical,
            is_well_balanced: height <= theoretical + 1,
            search_efficiency_gain: search_efficiency_gain(total, height),
        }
    }
}

/// ceil(log2(n + 1)), which is the bit length of n
pub fn theoretical_height(n: usize) -> u32 {
    usize::BITS - n.leading_zeros()
}

fn search_efficiency_gain(total: usize, height: u32) -> f64 {
    if total == 0 || height == 0 {
        return 1.0;
    }
    (total as f64 / 2.0) / f64::from(height)
}
