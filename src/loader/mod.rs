//! YAML Loader module
//!
//! Parse scenario definitions from YAML or JSON files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ScenarioDefinition` - Declarative failure schedule plus retry settings
//! - `RetryDefinition` - Retry budget, backoff and retriable messages
//! - Parsing with validation, by built-in name or by path

mod parser;
mod types;

pub use parser::{load_scenario, load_scenario_from_json, load_scenario_from_str};
pub use types::{RetryDefinition, ScenarioDefinition};
