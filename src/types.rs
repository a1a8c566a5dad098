//! Common types used throughout chaos-paging
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Index of a page. Signed so the end-of-pagination sentinel fits.
pub type PageIndex = i64;

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    Exponential,
    /// Delay follows the Fibonacci sequence (1, 1, 2, 3, 5, ...)
    #[default]
    Fibonacci,
}

impl BackoffType {
    /// Multiplier applied to the initial backoff for a zero-based retry attempt
    pub fn factor(self, attempt: u32) -> u32 {
        match self {
            BackoffType::Constant => 1,
            BackoffType::Linear => attempt.saturating_add(1),
            BackoffType::Exponential => 2u32.saturating_pow(attempt),
            BackoffType::Fibonacci => {
                let (mut a, mut b) = (1u32, 1u32);
                for _ in 0..attempt {
                    let next = a.saturating_add(b);
                    a = b;
                    b = next;
                }
                a
            }
        }
    }
}
