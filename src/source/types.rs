//! Page source types and traits
//!
//! Defines the record, page and failure-state types shared by all sources.

use crate::error::Result;
use crate::types::{JsonValue, PageIndex};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Sentinel page index meaning pagination has ended
pub const NO_MORE_PAGES: PageIndex = -1;

// ============================================================================
// Item
// ============================================================================

/// A synthetic record
///
/// Records are returned fully populated so any subset of fields can be read
/// after the fetch without going back to the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// `"{page}_{index}"`
    pub id: String,
    /// `10.0 * (page + 0.5)`
    pub amount: f64,
    /// Page the record was served on
    pub page: PageIndex,
}

impl Item {
    /// Names of the fields readable through [`Item::field`]
    pub const FIELDS: [&'static str; 3] = ["id", "amount", "page"];

    /// Synthesize the record at `index` on `page`
    #[allow(clippy::cast_precision_loss)]
    pub fn synthesize(page: PageIndex, index: usize) -> Self {
        Self {
            id: format!("{page}_{index}"),
            amount: 10.0 * (page as f64 + 0.5),
            page,
        }
    }

    /// Record identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Record amount
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Page the record came from
    pub fn page(&self) -> PageIndex {
        self.page
    }

    /// Read a single field by name, `None` for unknown names
    pub fn field(&self, name: &str) -> Option<JsonValue> {
        match name {
            "id" => Some(JsonValue::from(self.id.as_str())),
            "amount" => Some(JsonValue::from(self.amount)),
            "page" => Some(JsonValue::from(self.page)),
            _ => None,
        }
    }
}

// ============================================================================
// Paging Response
// ============================================================================

/// Pointer to the next page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingResponse {
    /// Next page to request, or [`NO_MORE_PAGES`]
    pub next_page: PageIndex,
}

impl PagingResponse {
    /// Continue with the given page
    pub fn next(page: PageIndex) -> Self {
        Self { next_page: page }
    }

    /// No more pages
    pub fn done() -> Self {
        Self {
            next_page: NO_MORE_PAGES,
        }
    }

    /// Check if pagination has ended
    pub fn is_done(&self) -> bool {
        self.next_page == NO_MORE_PAGES
    }
}

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Records in page order
    pub items: Vec<Item>,
    /// Where to go next
    pub response: PagingResponse,
}

impl Page {
    /// Number of records on the page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Failure Counter
// ============================================================================

/// Failure state for one scenario run
///
/// Owned by the caller and handed to the source at construction. Sources
/// sharing one counter share one failure budget.
#[derive(Debug, Default)]
pub struct FailureCounter {
    count: AtomicU32,
}

impl FailureCounter {
    /// Create a counter at zero, ready to share
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a counter that has already recorded `count` failures
    pub fn starting_at(count: u32) -> Self {
        Self {
            count: AtomicU32::new(count),
        }
    }

    /// Number of failures injected so far
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }

    /// Record one more failure unless `cap` has been reached.
    ///
    /// Returns `true` when the failure was recorded and should be injected.
    pub fn try_record(&self, cap: u32) -> bool {
        self.count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                (count < cap).then(|| count + 1)
            })
            .is_ok()
    }

    /// Check whether the budget `cap` is used up
    pub fn is_exhausted(&self, cap: u32) -> bool {
        self.count() >= cap
    }
}

// ============================================================================
// Page Source
// ============================================================================

/// Core trait for paginated data sources
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page. Sources never retry internally.
    async fn fetch_page(&self, page: PageIndex) -> Result<Page>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    async fn fetch_page(&self, page: PageIndex) -> Result<Page> {
        (**self).fetch_page(page).await
    }
}
