//! Retry module
//!
//! Re-invokes a failing operation while a classifier says the error is
//! transient and the retry budget allows it.
//!
//! # Features
//!
//! - **Pluggable Classification**: match on exact error messages, on the error
//!   kind, or on any closure
//! - **Backoff Strategies**: Constant, linear, exponential and Fibonacci
//! - **Cancellation**: backoff sleeps end early when the run is cancelled

mod classifier;
mod policy;

pub use classifier::{
    FnClassifier, MessageClassifier, NeverRetry, RetryClassifier, RetryDecision,
    RetryableErrorClassifier,
};
pub use policy::{RetryConfig, RetryConfigBuilder, RetryPolicy};
