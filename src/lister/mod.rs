//! Paginating lister module
//!
//! Drives a page source from page 0 to the end-of-pagination sentinel,
//! retrying each page through a retry policy and streaming records into a
//! sink.
//!
//! # Overview
//!
//! The lister module provides:
//! - `PaginatingLister` - the sequential fetch loop
//! - `RecordSink` and its implementations - where records go
//! - `ListStats` - counters for one run

mod sink;
mod types;

pub use sink::{ChannelSink, CountingSink, FnSink, JsonLinesSink, RecordSink};
pub use types::ListStats;

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::source::{Item, PageSource};
use crate::types::PageIndex;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Sequential, retrying pagination consumer
pub struct PaginatingLister<S> {
    /// Page source
    source: S,
    /// Retry policy applied to every page fetch
    retry: RetryPolicy,
    /// Cancellation for the whole run
    cancel: CancelToken,
    /// Statistics of the latest run
    stats: ListStats,
}

impl<S: PageSource> PaginatingLister<S> {
    /// Create a lister with the default retry policy
    pub fn new(source: S) -> Self {
        Self {
            source,
            retry: RetryPolicy::default(),
            cancel: CancelToken::new(),
            stats: ListStats::default(),
        }
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the cancellation token
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get the page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the cancellation token
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Statistics of the latest run, including one that failed
    pub fn stats(&self) -> &ListStats {
        &self.stats
    }

    /// List every page into `sink`.
    ///
    /// Records are emitted in page order. On the first unrecoverable error the
    /// loop stops and the error is returned as-is; records already emitted
    /// stay emitted.
    pub async fn list<K>(&mut self, sink: &mut K) -> Result<ListStats>
    where
        K: RecordSink + ?Sized,
    {
        self.stats = ListStats::new();
        let start = Instant::now();

        let result = self.run(sink).await;

        #[allow(clippy::cast_possible_truncation)]
        self.stats.set_duration(start.elapsed().as_millis() as u64);

        match result {
            Ok(()) => {
                info!(
                    "Listing complete: {} records in {} pages ({} retries)",
                    self.stats.records_emitted, self.stats.pages_fetched, self.stats.retries
                );
                Ok(self.stats.clone())
            }
            Err(e) => {
                warn!(
                    "Listing stopped after {} records: {e}",
                    self.stats.records_emitted
                );
                Err(e)
            }
        }
    }

    /// List every page and collect the records
    pub async fn list_all(&mut self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        self.list(&mut items).await?;
        Ok(items)
    }

    async fn run<K>(&mut self, sink: &mut K) -> Result<()>
    where
        K: RecordSink + ?Sized,
    {
        let mut current: PageIndex = 0;

        loop {
            if self.cancel.is_cancelled() {
                debug!(page = current, "Cancelled before fetching page");
                return Err(Error::Cancelled);
            }

            let source = &self.source;
            let mut attempts = 0;
            let fetched = self
                .retry
                .invoke(&self.cancel, || {
                    attempts += 1;
                    source.fetch_page(current)
                })
                .await;
            self.stats.add_attempts(attempts);
            let page = fetched?;

            self.stats.add_page();
            debug!(
                page = current,
                records = page.len(),
                attempts,
                "Fetched page"
            );

            for item in page.items {
                sink.emit(item)?;
                self.stats.add_record();
            }

            if page.response.is_done() {
                return Ok(());
            }
            current = page.response.next_page;
        }
    }
}

impl<S> std::fmt::Debug for PaginatingLister<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatingLister")
            .field("retry", &self.retry)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
