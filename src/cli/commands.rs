//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};

/// Deterministic fault-injecting pagination CLI
#[derive(Parser, Debug)]
#[command(name = "chaos-paging")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scenario to use: a built-in name or a YAML/JSON file
    #[arg(short, long, global = true, default_value = "bug-cache-sum")]
    pub scenario: String,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every page of the scenario
    Run {
        /// Scenario overrides
        #[command(flatten)]
        overrides: ScenarioOverrides,
    },

    /// Fetch one page repeatedly against a fresh failure counter
    Fetch {
        /// Page to request
        #[arg(long)]
        page: i64,

        /// Number of requests
        #[arg(long, default_value = "1")]
        times: u32,

        /// Scenario overrides
        #[command(flatten)]
        overrides: ScenarioOverrides,
    },

    /// Print the resolved scenario definition as YAML
    Show {
        /// Scenario overrides
        #[command(flatten)]
        overrides: ScenarioOverrides,
    },

    /// List built-in scenarios
    List,
}

/// Command-line overrides applied on top of the loaded scenario
#[derive(Args, Debug, Clone, Default)]
pub struct ScenarioOverrides {
    /// Number of valid pages
    #[arg(long)]
    pub max_pages: Option<i64>,

    /// Records per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Page that fails transiently
    #[arg(long)]
    pub error_after_page: Option<i64>,

    /// How many times the failing page fails
    #[arg(long)]
    pub failure_count: Option<u32>,

    /// Retries after the first attempt
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Initial backoff in milliseconds
    #[arg(long)]
    pub backoff_ms: Option<u64>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line, then a summary line)
    Json,
    /// Human-readable summary
    Pretty,
    /// Nothing on stdout; logs only
    Quiet,
}
