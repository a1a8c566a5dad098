//! CLI runner - executes commands

use crate::cancel::CancelToken;
use crate::cli::commands::{Cli, Commands, OutputFormat, ScenarioOverrides};
use crate::error::{Result, ResultExt};
use crate::lister::{CountingSink, JsonLinesSink, ListStats, PaginatingLister};
use crate::loader::{load_scenario, ScenarioDefinition};
use crate::scenarios;
use crate::source::{ChaosPageSource, PageSource};
use serde_json::json;
use std::io::{self, BufWriter, Write};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run { overrides } => self.run_scenario(overrides).await,
            Commands::Fetch {
                page,
                times,
                overrides,
            } => self.fetch(*page, *times, overrides).await,
            Commands::Show { overrides } => self.show(overrides),
            Commands::List => self.list_scenarios(),
        }
    }

    /// Load the scenario and apply command-line overrides
    fn load_definition(&self, overrides: &ScenarioOverrides) -> Result<ScenarioDefinition> {
        let mut def = load_scenario(&self.cli.scenario)
            .with_context(|| format!("Failed to load scenario '{}'", self.cli.scenario))?;

        if let Some(max_pages) = overrides.max_pages {
            def.max_pages = max_pages;
        }
        if let Some(page_size) = overrides.page_size {
            def.page_size = page_size;
        }
        if let Some(error_after_page) = overrides.error_after_page {
            def.error_after_page = error_after_page;
        }
        if let Some(failure_count) = overrides.failure_count {
            def.failure_count = failure_count;
        }
        if let Some(max_retries) = overrides.max_retries {
            def.retry.max_retries = max_retries;
        }
        if let Some(backoff_ms) = overrides.backoff_ms {
            def.retry.initial_backoff_ms = backoff_ms;
            def.retry.max_backoff_ms = def.retry.max_backoff_ms.max(backoff_ms);
        }

        def.validate()?;
        debug!("Resolved scenario: {def:?}");
        Ok(def)
    }

    /// List every page of the scenario
    async fn run_scenario(&self, overrides: &ScenarioOverrides) -> Result<()> {
        let def = self.load_definition(overrides)?;
        info!(
            "Running scenario '{}': {} pages of {} records, page {} fails {} times",
            def.name, def.max_pages, def.page_size, def.error_after_page, def.failure_count
        );

        let cancel = CancelToken::new();
        let ctrl_c = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let source = ChaosPageSource::new(def.scenario());
        let mut lister = PaginatingLister::new(source)
            .with_retry(def.retry_policy())
            .with_cancel(cancel);

        let mut counter = CountingSink::new();
        let result = match self.cli.format {
            OutputFormat::Json => {
                let mut sink = JsonLinesSink::new(BufWriter::new(io::stdout().lock()));
                let result = lister.list(&mut sink).await;
                sink.finish(result)
            }
            OutputFormat::Pretty | OutputFormat::Quiet => lister.list(&mut counter).await,
        };
        ctrl_c.abort();

        let stats = lister.stats();
        let error = result.as_ref().err().map(ToString::to_string);
        match self.cli.format {
            OutputFormat::Json => {
                let summary = json!({
                    "type": "summary",
                    "scenario": def.name,
                    "stats": stats,
                    "error": error,
                });
                println!("{summary}");
            }
            OutputFormat::Pretty => print_summary(&def, stats, &counter, error.as_deref()),
            OutputFormat::Quiet => {}
        }

        result.map(|_| ())
    }

    /// Request one page `times` times against a fresh failure counter
    async fn fetch(&self, page: i64, times: u32, overrides: &ScenarioOverrides) -> Result<()> {
        let def = self.load_definition(overrides)?;
        let source = ChaosPageSource::new(def.scenario());
        let mut stdout = io::stdout().lock();

        for attempt in 1..=times {
            let outcome = source.fetch_page(page).await;
            match self.cli.format {
                OutputFormat::Json => {
                    let line = match &outcome {
                        Ok(fetched) => json!({
                            "attempt": attempt,
                            "page": page,
                            "records": fetched.len(),
                            "next_page": fetched.response.next_page,
                        }),
                        Err(e) => json!({
                            "attempt": attempt,
                            "page": page,
                            "error": e.to_string(),
                            "retriable": e.is_retryable(),
                        }),
                    };
                    writeln!(stdout, "{line}")?;
                }
                OutputFormat::Pretty => match &outcome {
                    Ok(fetched) => writeln!(
                        stdout,
                        "attempt {attempt}: {} records, next page {}",
                        fetched.len(),
                        fetched.response.next_page
                    )?,
                    Err(e) => {
                        let kind = if e.is_retryable() { "retriable" } else { "fatal" };
                        writeln!(stdout, "attempt {attempt}: {e} ({kind})")?;
                    }
                },
                OutputFormat::Quiet => {}
            }
        }

        stdout.flush()?;
        Ok(())
    }

    /// Print the resolved scenario as YAML
    fn show(&self, overrides: &ScenarioOverrides) -> Result<()> {
        let def = self.load_definition(overrides)?;
        print!("{}", serde_yaml::to_string(&def)?);
        Ok(())
    }

    /// List built-in scenarios
    fn list_scenarios(&self) -> Result<()> {
        for name in scenarios::list_builtin() {
            let def = load_scenario(name)?;
            match self.cli.format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({"name": def.name, "description": def.description})
                ),
                _ => println!("{:<20} {}", def.name, def.description.unwrap_or_default()),
            }
        }
        Ok(())
    }
}

/// Human-readable run summary
fn print_summary(
    def: &ScenarioDefinition,
    stats: &ListStats,
    counter: &CountingSink,
    error: Option<&str>,
) {
    println!("Scenario:   {}", def.name);
    println!("Started:    {}", stats.started_at.to_rfc3339());
    println!("Pages:      {}", stats.pages_fetched);
    println!("Records:    {}", stats.records_emitted);
    println!("Amount sum: {:.2}", counter.amount_sum);
    println!("Attempts:   {} ({} retries)", stats.attempts, stats.retries);
    println!("Duration:   {}ms", stats.duration_ms);
    match error {
        Some(e) => println!("Result:     failed: {e}"),
        None => println!("Result:     complete"),
    }
}
