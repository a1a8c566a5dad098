//! # chaos-paging
//!
//! A deterministic fault-injecting paginated data source, plus a generic
//! retry-driven pagination consumer, for exercising retry, pagination and
//! caching logic under controlled failure injection.
//!
//! ## Features
//!
//! - **Deterministic Pages**: Synthetic records whose contents depend only on the page index
//! - **Scripted Failures**: One designated page fails a fixed number of times, then succeeds
//! - **Pluggable Retry**: Message, kind or closure based classification with backoff
//! - **Cancellation**: Runs stop between pages or mid-backoff when cancelled
//! - **Declarative Scenarios**: Built-in or custom YAML/JSON scenario files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chaos_paging::{ChaosPageSource, PaginatingLister, RetryConfig, RetryPolicy, Scenario};
//!
//! #[tokio::main]
//! async fn main() -> chaos_paging::Result<()> {
//!     let source = ChaosPageSource::new(Scenario::bug_cache_sum());
//!     let policy = RetryPolicy::with_messages(RetryConfig::default(), ["Retriable Error"]);
//!
//!     let mut lister = PaginatingLister::new(source).with_retry(policy);
//!     let items = lister.list_all().await?;
//!     assert_eq!(items.len(), 10_000);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    PaginatingLister                       │
//! │   page 0 → page 1 → ... → NO_MORE_PAGES   (strict order)  │
//! └───────────────────────────────────────────────────────────┘
//!          │                    │                    │
//! ┌────────┴───────┐  ┌─────────┴────────┐  ┌────────┴────────┐
//! │  RetryPolicy   │  │   PageSource     │  │   RecordSink    │
//! ├────────────────┤  ├──────────────────┤  ├─────────────────┤
//! │ Classifier     │  │ ChaosPageSource  │  │ Vec / Fn        │
//! │ Backoff        │  │ FailureCounter   │  │ Channel         │
//! │ CancelToken    │  │                  │  │ JSON lines      │
//! └────────────────┘  └──────────────────┘  └─────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cooperative cancellation
pub mod cancel;

/// Page sources and synthetic records
pub mod source;

/// Retry policy and classifiers
pub mod retry;

/// Pagination loop and record sinks
pub mod lister;

/// Scenario definition loader
pub mod loader;

/// Built-in scenario definitions
pub mod scenarios;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use lister::{ListStats, PaginatingLister, RecordSink};
pub use loader::{load_scenario, load_scenario_from_str, ScenarioDefinition};
pub use retry::{RetryClassifier, RetryConfig, RetryDecision, RetryPolicy};
pub use source::{
    ChaosPageSource, FailureCounter, Item, Page, PageSource, PagingResponse, Scenario,
    NO_MORE_PAGES,
};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
