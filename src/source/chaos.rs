//! Fault-injecting page source
//!
//! Serves `max_pages` deterministic pages and fails the designated page
//! `failure_count` times before letting it through.

use super::types::{FailureCounter, Item, Page, PageSource, PagingResponse};
use crate::error::{Error, Result};
use crate::types::PageIndex;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Message carried by injected failures unless a scenario overrides it
pub const DEFAULT_RETRIABLE_MESSAGE: &str = "Retriable Error";

/// Failure schedule and page shape for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Number of valid pages; requesting this index is an invalid page
    pub max_pages: PageIndex,
    /// Records per page
    pub page_size: usize,
    /// Page that fails transiently
    pub error_after_page: PageIndex,
    /// How many times that page fails before succeeding
    pub failure_count: u32,
    /// Display text of the injected failure
    pub retriable_message: String,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::bug_cache_sum()
    }
}

impl Scenario {
    /// Four pages of 2500 records; page 3 fails five times then succeeds
    pub fn bug_cache_sum() -> Self {
        Self {
            max_pages: 4,
            page_size: 2500,
            error_after_page: 3,
            failure_count: 5,
            retriable_message: DEFAULT_RETRIABLE_MESSAGE.to_string(),
        }
    }

    /// Set page count
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: PageIndex) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set records per page
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the failing page and how often it fails
    #[must_use]
    pub fn with_failures(mut self, error_after_page: PageIndex, failure_count: u32) -> Self {
        self.error_after_page = error_after_page;
        self.failure_count = failure_count;
        self
    }

    /// Set the injected failure message
    #[must_use]
    pub fn with_retriable_message(mut self, message: impl Into<String>) -> Self {
        self.retriable_message = message.into();
        self
    }

    /// Total records a complete run emits
    pub fn total_records(&self) -> usize {
        usize::try_from(self.max_pages.max(0))
            .unwrap_or(usize::MAX)
            .saturating_mul(self.page_size)
    }
}

/// Deterministic page source with scripted transient failures
#[derive(Debug, Clone)]
pub struct ChaosPageSource {
    scenario: Scenario,
    failures: Arc<FailureCounter>,
}

impl ChaosPageSource {
    /// Create a source with a fresh failure counter
    pub fn new(scenario: Scenario) -> Self {
        Self::with_counter(scenario, FailureCounter::shared())
    }

    /// Create a source that records failures in a caller-owned counter
    pub fn with_counter(scenario: Scenario, failures: Arc<FailureCounter>) -> Self {
        Self { scenario, failures }
    }

    /// Scenario being served
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Failure counter for this run
    pub fn failures(&self) -> &Arc<FailureCounter> {
        &self.failures
    }

    /// Serve one page synchronously
    pub fn page(&self, page: PageIndex) -> Result<Page> {
        let scenario = &self.scenario;

        if page == scenario.max_pages {
            debug!(page, "Rejecting page past the valid range");
            return Err(Error::invalid_page(page));
        }

        if page == scenario.error_after_page && self.failures.try_record(scenario.failure_count) {
            warn!(
                "Injecting failure on page {page} ({}/{})",
                self.failures.count(),
                scenario.failure_count
            );
            return Err(Error::retriable(scenario.retriable_message.clone()));
        }

        let items: Vec<Item> = (0..scenario.page_size)
            .map(|index| Item::synthesize(page, index))
            .collect();

        let response = match page.checked_add(1) {
            Some(next) if next != scenario.max_pages => PagingResponse::next(next),
            _ => PagingResponse::done(),
        };

        debug!(
            page,
            records = items.len(),
            next_page = response.next_page,
            "Served page"
        );

        Ok(Page { items, response })
    }
}

#[async_trait]
impl PageSource for ChaosPageSource {
    async fn fetch_page(&self, page: PageIndex) -> Result<Page> {
        self.page(page)
    }
}
