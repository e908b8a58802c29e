//! Index configuration
//!
//! Loaded from a JSON file. Every field is optional:
//!
//! ```json
//! {
//!   "staleness_threshold_secs": 300,
//!   "actionable_statuses": ["Pending", "Assigned"],
//!   "default_top_urgent": 5
//! }
//! ```

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::errors::{IndexError, IndexResult};
use crate::issue::IssueStatus;
use crate::observability::{IndexEvent, Logger};

/// Upper bound on the staleness threshold: one year
const MAX_STALENESS_SECS: u64 = 365 * 24 * 60 * 60;

/// Tunables for one `IssueIndex`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Age after which the next read rebuilds the index (default 5 minutes)
    #[serde(default = "default_staleness_threshold_secs")]
    pub staleness_threshold_secs: u64,

    /// Statuses whose prioritised issues enter the urgency queue
    #[serde(default = "default_actionable_statuses")]
    pub actionable_statuses: Vec<IssueStatus>,

    /// Count used by `top_urgent()` (default 5)
    #[serde(default = "default_top_urgent")]
    pub default_top_urgent: usize,
}

fn default_staleness_threshold_secs() -> u64 {
    300
}

fn default_actionable_statuses() -> Vec<IssueStatus> {
    vec![IssueStatus::Pending, IssueStatus::Assigned]
}

fn default_top_urgent() -> usize {
    5
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            staleness_threshold_secs: default_staleness_threshold_secs(),
            actionable_statuses: default_actionable_statuses(),
            default_top_urgent: default_top_urgent(),
        }
    }
}

impl IndexConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> IndexResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| IndexError::config(format!("failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&content)?;

        let shown = path.display().to_string();
        let threshold = config.staleness_threshold_secs.to_string();
        Logger::info(
            IndexEvent::ConfigLoaded.as_str(),
            &[("path", shown.as_str()), ("staleness_threshold_secs", threshold.as_str())],
        );
        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> IndexResult<Self> {
        let config: IndexConfig = serde_json::from_str(content)
            .map_err(|e| IndexError::config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the staleness threshold
    pub fn with_staleness_threshold_secs(mut self, secs: u64) -> Self {
        self.staleness_threshold_secs = secs;
        self
    }

    /// Sets the actionable statuses
    pub fn with_actionable_statuses(mut self, statuses: Vec<IssueStatus>) -> Self {
        self.actionable_statuses = statuses;
        self
    }

    /// Checks ranges that serde cannot express
    pub fn validate(&self) -> IndexResult<()> {
        if self.staleness_threshold_secs == 0 {
            return Err(IndexError::config("staleness_threshold_secs must be > 0"));
        }
        if self.staleness_threshold_secs > MAX_STALENESS_SECS {
            return Err(IndexError::config(format!(
                "staleness_threshold_secs must be <= {}",
                MAX_STALENESS_SECS
            )));
        }
        if self.actionable_statuses.is_empty() {
            return Err(IndexError::config("actionable_statuses must not be empty"));
        }
        if self.default_top_urgent == 0 {
            return Err(IndexError::config("default_top_urgent must be > 0"));
        }
        Ok(())
    }

    /// Staleness threshold as a chrono duration
    pub fn staleness_threshold(&self) -> Duration {
        Duration::seconds(self.staleness_threshold_secs.min(MAX_STALENESS_SECS) as i64)
    }

    /// True if issues in `status` belong in the urgency queue
    pub fn is_actionable(&self, status: IssueStatus) -> bool {
        self.actionable_statuses.contains(&status)
    }
}
