//! Lister types
//!
//! Statistics reported by a listing run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics from a listing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListStats {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Pages fetched successfully
    pub pages_fetched: usize,
    /// Records handed to the sink
    pub records_emitted: usize,
    /// Fetch attempts, including failed ones
    pub attempts: usize,
    /// Attempts beyond the first for each page
    pub retries: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl Default for ListStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ListStats {
    /// Create new stats starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            pages_fetched: 0,
            records_emitted: 0,
            attempts: 0,
            retries: 0,
            duration_ms: 0,
        }
    }

    /// Add a successfully fetched page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add an emitted record
    pub fn add_record(&mut self) {
        self.records_emitted += 1;
    }

    /// Add the attempts spent on one page
    pub fn add_attempts(&mut self, attempts: usize) {
        self.attempts += attempts;
        self.retries += attempts.saturating_sub(1);
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
