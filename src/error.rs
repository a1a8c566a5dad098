//! Error types for chaos-paging
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for chaos-paging
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Paging Errors
    // ============================================================================
    /// The requested page is past the known valid range. Never retried.
    #[error("invalid page")]
    InvalidPage {
        /// Rejected page index
        page: i64,
    },

    /// Injected transient failure. Displays exactly `message` so classifiers
    /// can match on the error text.
    #[error("{message}")]
    Retriable {
        /// Text the failure displays
        message: String,
    },

    /// The run was cancelled through its token
    #[error("operation cancelled")]
    Cancelled,

    /// A record sink refused a record
    #[error("Sink rejected record: {message}")]
    Sink {
        /// Why the record was refused
        message: String,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Malformed or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A configuration field holds an unacceptable value
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue {
        /// Offending field
        field: String,
        /// Constraint that was violated
        message: String,
    },

    /// Neither a built-in name nor an existing file
    #[error("Scenario '{name}' not found. Built-in scenarios: {builtin}. Or provide a path to a YAML file.")]
    ScenarioNotFound {
        /// Requested name or path
        name: String,
        /// Comma-separated built-in names
        builtin: String,
    },

    /// YAML deserialization failure
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON (de)serialization failure
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// Filesystem or stream failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Error with added context
    #[error("{0}")]
    Other(String),

    /// Error raised by caller-supplied code such as a sink closure
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid page error
    pub fn invalid_page(page: i64) -> Self {
        Self::InvalidPage { page }
    }

    /// Create a retriable error carrying the given message
    pub fn retriable(message: impl Into<String>) -> Self {
        Self::Retriable {
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Retriable { .. })
    }

    /// Check if this error is the result of cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type alias for chaos-paging
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_page(4);
        assert_eq!(err.to_string(), "invalid page");

        let err = Error::retriable("Retriable Error");
        assert_eq!(err.to_string(), "Retriable Error");

        let err = Error::invalid_value("page_size", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'page_size': must be positive"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::retriable("boom").is_retryable());

        assert!(!Error::invalid_page(4).is_retryable());
        assert!(!Error::Cancelled.is_retryable());
        assert!(!Error::sink("closed").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_anyhow_conversion_is_transparent() {
        fn caller_code() -> anyhow::Result<()> {
            anyhow::bail!("upstream exploded")
        }

        fn wrapped() -> Result<()> {
            caller_code()?;
            Ok(())
        }

        let err = wrapped().unwrap_err();
        assert!(matches!(err, Error::Anyhow(_)));
        assert_eq!(err.to_string(), "upstream exploded");
    }

    #[test]
    fn test_is_cancelled() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::invalid_page(0).is_cancelled());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
