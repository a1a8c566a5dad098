//! Retry classifiers
//!
//! A classifier decides, per error, whether the policy may try again.

use crate::error::Error;

/// Outcome of classifying an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Transient, the operation may be invoked again
    Retry,
    /// Give up and hand the error back unchanged
    Fatal,
}

impl RetryDecision {
    /// Map a boolean "should retry" answer
    pub fn from_bool(retry: bool) -> Self {
        if retry {
            Self::Retry
        } else {
            Self::Fatal
        }
    }

    /// Check if the error should be retried
    pub fn should_retry(&self) -> bool {
        matches!(self, Self::Retry)
    }
}

/// Decides whether an error is worth retrying
pub trait RetryClassifier: Send + Sync {
    /// Classify a single error
    fn classify(&self, error: &Error) -> RetryDecision;
}

// ============================================================================
// Message Classifier
// ============================================================================

/// Retries errors whose display text equals one of the configured messages
#[derive(Debug, Clone, Default)]
pub struct MessageClassifier {
    messages: Vec<String>,
}

impl MessageClassifier {
    /// Create a classifier matching any of `messages`
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a classifier matching a single message
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    /// Messages treated as retriable
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl RetryClassifier for MessageClassifier {
    fn classify(&self, error: &Error) -> RetryDecision {
        let text = error.to_string();
        RetryDecision::from_bool(self.messages.iter().any(|m| *m == text))
    }
}

// ============================================================================
// Kind-based Classifier
// ============================================================================

/// Retries any error for which [`Error::is_retryable`] holds
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryableErrorClassifier;

impl RetryClassifier for RetryableErrorClassifier {
    fn classify(&self, error: &Error) -> RetryDecision {
        RetryDecision::from_bool(error.is_retryable())
    }
}

// ============================================================================
// Closure Classifier
// ============================================================================

/// Wraps a `Fn(&Error) -> bool` predicate
pub struct FnClassifier<F> {
    predicate: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(&Error) -> bool + Send + Sync,
{
    /// Create a classifier from a predicate
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> RetryClassifier for FnClassifier<F>
where
    F: Fn(&Error) -> bool + Send + Sync,
{
    fn classify(&self, error: &Error) -> RetryDecision {
        RetryDecision::from_bool((self.predicate)(error))
    }
}

impl<F> std::fmt::Debug for FnClassifier<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnClassifier").finish_non_exhaustive()
    }
}

// ============================================================================
// Never Retry
// ============================================================================

/// Treats every error as fatal
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverRetry;

impl RetryClassifier for NeverRetry {
    fn classify(&self, _error: &Error) -> RetryDecision {
        RetryDecision::Fatal
    }
}
