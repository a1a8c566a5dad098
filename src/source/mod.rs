//! Page source module
//!
//! A page source hands out one page of records per call. The chaos source
//! synthesizes deterministic records and injects a fixed number of transient
//! failures on one designated page.
//!
//! # Overview
//!
//! - `Item` - a fully materialized synthetic record
//! - `Page` / `PagingResponse` - the result of one fetch and its next-page pointer
//! - `PageSource` - the async seam the lister drives
//! - `ChaosPageSource` - the fault-injecting implementation
//! - `FailureCounter` - caller-owned failure state for one scenario run

mod chaos;
mod types;

pub use chaos::{ChaosPageSource, Scenario, DEFAULT_RETRIABLE_MESSAGE};
pub use types::{FailureCounter, Item, Page, PageSource, PagingResponse, NO_MORE_PAGES};
