//! CLI module
//!
//! Command-line interface for running chaos scenarios.
//!
//! # Commands
//!
//! - `run` - List every page of a scenario through the retry policy
//! - `fetch` - Request a single page repeatedly and show each outcome
//! - `show` - Print the resolved scenario definition
//! - `list` - List built-in scenarios

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, ScenarioOverrides};
pub use runner::Runner;
