//! Loader types
//!
//! Declarative scenario definition types for YAML parsing.

use crate::error::{Error, Result};
use crate::retry::{MessageClassifier, RetryConfig, RetryPolicy};
use crate::source::{Scenario, DEFAULT_RETRIABLE_MESSAGE};
use crate::types::{BackoffType, PageIndex};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Scenario Definition
// ============================================================================

/// Top-level scenario definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScenarioDefinition {
    /// Scenario name
    pub name: String,
    /// What the scenario exercises
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of valid pages
    #[serde(default = "default_max_pages")]
    pub max_pages: PageIndex,
    /// Records per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Page that fails transiently
    #[serde(default = "default_error_after_page")]
    pub error_after_page: PageIndex,
    /// How many times that page fails
    #[serde(default = "default_failure_count")]
    pub failure_count: u32,
    /// Display text of the injected failure
    #[serde(default = "default_retriable_message")]
    pub retriable_message: String,
    /// Retry settings for the lister
    #[serde(default)]
    pub retry: RetryDefinition,
}

fn default_max_pages() -> PageIndex {
    4
}

fn default_page_size() -> usize {
    2500
}

fn default_error_after_page() -> PageIndex {
    3
}

fn default_failure_count() -> u32 {
    5
}

fn default_retriable_message() -> String {
    DEFAULT_RETRIABLE_MESSAGE.to_string()
}

impl ScenarioDefinition {
    /// Validate the definition
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::config("Scenario name cannot be empty"));
        }

        if self.max_pages < 1 {
            return Err(Error::invalid_value(
                "max_pages",
                format!("must be at least 1, got {}", self.max_pages),
            ));
        }

        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be positive"));
        }

        if self.error_after_page < 0 {
            return Err(Error::invalid_value(
                "error_after_page",
                format!("must not be negative, got {}", self.error_after_page),
            ));
        }

        if self.retry.max_backoff_ms < self.retry.initial_backoff_ms {
            return Err(Error::invalid_value(
                "retry.max_backoff_ms",
                "must not be smaller than retry.initial_backoff_ms",
            ));
        }

        Ok(())
    }

    /// Runtime scenario for the page source
    pub fn scenario(&self) -> Scenario {
        Scenario {
            max_pages: self.max_pages,
            page_size: self.page_size,
            error_after_page: self.error_after_page,
            failure_count: self.failure_count,
            retriable_message: self.retriable_message.clone(),
        }
    }

    /// Retry policy matching the configured messages.
    ///
    /// With no explicit `retry_messages` the scenario's own
    /// `retriable_message` is the one retried.
    pub fn retry_policy(&self) -> RetryPolicy {
        let messages = if self.retry.retry_messages.is_empty() {
            vec![self.retriable_message.clone()]
        } else {
            self.retry.retry_messages.clone()
        };
        RetryPolicy::new(self.retry.config(), MessageClassifier::new(messages))
    }
}

// ============================================================================
// Retry Definition
// ============================================================================

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryDefinition {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff shape
    #[serde(default)]
    pub backoff: BackoffType,
    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Backoff cap in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Error messages that are retried
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub retry_messages: Vec<String>,
}

fn default_max_retries() -> u32 {
    10
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    5000
}

impl Default for RetryDefinition {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            retry_messages: Vec::new(),
        }
    }
}

impl RetryDefinition {
    /// Convert to a runtime retry config
    pub fn config(&self) -> RetryConfig {
        RetryConfig::builder()
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            )
            .build()
    }
}
