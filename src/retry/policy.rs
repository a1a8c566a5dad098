//! Retry policy with backoff
//!
//! Provides a policy that:
//! - Re-invokes an operation while its errors classify as retriable
//! - Stops after a fixed retry budget and returns the last error unchanged
//! - Sleeps between attempts according to the configured backoff
//! - Gives up with `Error::Cancelled` as soon as the run is cancelled

use super::classifier::{MessageClassifier, NeverRetry, RetryClassifier};
use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::source::DEFAULT_RETRIABLE_MESSAGE;
use crate::types::BackoffType;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the retry policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            backoff_type: BackoffType::Fibonacci,
        }
    }
}

impl RetryConfig {
    /// Create a new config builder
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// Calculate backoff delay for a given zero-based retry attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_backoff
            .saturating_mul(self.backoff_type.factor(attempt));
        std::cmp::min(delay, self.max_backoff)
    }
}

/// Builder for retry config
#[derive(Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Retry immediately without sleeping
    pub fn no_backoff(mut self) -> Self {
        self.config.initial_backoff = Duration::ZERO;
        self.config.max_backoff = Duration::ZERO;
        self
    }

    /// Build the config
    pub fn build(self) -> RetryConfig {
        self.config
    }
}

/// Retry policy: a budget, a backoff and a classifier
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    classifier: Arc<dyn RetryClassifier>,
}

impl RetryPolicy {
    /// Create a policy with a custom classifier
    pub fn new(config: RetryConfig, classifier: impl RetryClassifier + 'static) -> Self {
        Self {
            config,
            classifier: Arc::new(classifier),
        }
    }

    /// Create a policy that retries errors carrying one of `messages`
    pub fn with_messages<I, S>(config: RetryConfig, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(config, MessageClassifier::new(messages))
    }

    /// Create a policy that never retries
    pub fn no_retry() -> Self {
        Self::new(
            RetryConfig::builder().max_retries(0).no_backoff().build(),
            NeverRetry,
        )
    }

    /// Retry configuration
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Classifier deciding which errors are retried
    pub fn classifier(&self) -> &dyn RetryClassifier {
        self.classifier.as_ref()
    }

    /// Run `operation` until it succeeds, fails fatally, exhausts the retry
    /// budget or the token is cancelled.
    ///
    /// The error returned after the budget runs out is the operation's own
    /// last error, not a wrapper.
    pub async fn invoke<T, F, Fut>(&self, cancel: &CancelToken, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !self.classifier.classify(&error).should_retry() {
                debug!("Not retrying fatal error: {error}");
                return Err(error);
            }

            if attempt >= max_retries {
                warn!("Giving up after {} attempts: {error}", attempt + 1);
                return Err(error);
            }

            let delay = self.config.backoff(attempt);
            warn!(
                "Retriable error '{error}', attempt {}/{}, retrying in {:?}",
                attempt + 1,
                max_retries.saturating_add(1),
                delay
            );

            tokio::select! {
                () = cancel.cancelled() => return Err(Error::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_messages(RetryConfig::default(), [DEFAULT_RETRIABLE_MESSAGE])
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
