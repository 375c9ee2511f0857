//! Export command implementation

use crate::config::{ShopConfig, DEFAULT_MAX_PAGES, MAX_PAGE_SIZE};
use crate::downloader::{ExportExecutor, ExportReport, LogProgress, ProgressObserver};
use crate::downloader::progress::ExportProgress;
use crate::fetcher::ShopFetcher;
use crate::filter::{DateWindow, MatchCriteria};
use crate::output::csv::CsvMatchWriter;
use crate::output::MatchWriter;
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::CliError;

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "ordini_con_ca.csv";

/// Parse a calendar date in YYYY-MM-DD format
fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{input}' (expected YYYY-MM-DD): {e}"))
}

/// Order Comment Exporter CLI
#[derive(Parser, Debug)]
#[command(name = "order-comment-exporter")]
#[command(about = "Export order comments matching a date window and author from a shop admin API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json or human)
    #[arg(long, global = true, default_value = "human")]
    pub output_format: OutputFormat,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export matching order comments to CSV
    Export(ExportArgs),
}

/// Export command arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Shop base URL (e.g., https://example.myshopify.com)
    #[arg(long, env = "SHOP_URL")]
    pub shop_url: String,

    /// Admin API version (e.g., 2024-01)
    #[arg(long, env = "API_VERSION")]
    pub api_version: String,

    /// Admin API access token
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// First included order date (YYYY-MM-DD, default: first day of the current month)
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Last included order date (YYYY-MM-DD, default: today)
    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,

    /// Output CSV path
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Orders per page (1-250)
    #[arg(long, default_value_t = MAX_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64))]
    pub page_size: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Pause after each order's events request, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub detail_delay_ms: u64,

    /// Maximum order pages to follow before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// Text an event message must contain (case-insensitive)
    #[arg(long, default_value = "ca")]
    pub message: String,

    /// Term the event author must contain (repeatable, all must match)
    #[arg(long = "author", default_values_t = [String::from("chiara"), String::from("azzaretto")])]
    pub author_terms: Vec<String>,

    /// Serve Prometheus metrics on this address during the run
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Human,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

/// Progress bar observer
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        Self::from_bar(ProgressBar::new(0))
    }

    fn from_bar(bar: ProgressBar) -> Self {
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} orders ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message("Fetching orders...");
        Self { bar }
    }

    /// Clear the bar; runs over an empty collection never report progress
    fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ProgressObserver for BarProgress {
    fn on_progress(&self, progress: ExportProgress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.completed as u64);
        if progress.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ExportArgs {
    /// Build and validate the shop configuration
    pub fn shop_config(&self) -> Result<ShopConfig, CliError> {
        let config = ShopConfig::new(&self.shop_url, &self.api_version, &self.access_token)
            .with_page_size(self.page_size)
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_detail_delay(Duration::from_millis(self.detail_delay_ms))
            .with_max_pages(self.max_pages);
        config.validate()?;
        Ok(config)
    }

    /// Resolve the date window, defaulting relative to `today`
    pub fn date_window(&self, today: NaiveDate) -> Result<DateWindow, CliError> {
        let start = self
            .start_date
            .unwrap_or_else(|| today.with_day(1).unwrap_or(today));
        let end = self.end_date.unwrap_or(today);
        Ok(DateWindow::new(start, end)?)
    }

    /// Match criteria from the message and author options
    pub fn criteria(&self) -> Result<MatchCriteria, CliError> {
        let criteria = MatchCriteria::new(&self.message, &self.author_terms);
        if criteria.message_needle().is_empty() {
            return Err(CliError::InvalidArgument(
                "--message must not be empty".to_string(),
            ));
        }
        if criteria.author_terms().is_empty() {
            return Err(CliError::InvalidArgument(
                "at least one non-empty --author term is required".to_string(),
            ));
        }
        Ok(criteria)
    }

    /// Execute the export command
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        // Everything that can be rejected is checked before the first request.
        let config = self.shop_config()?;
        let window = self.date_window(Utc::now().date_naive())?;
        let criteria = self.criteria()?;

        if let Some(addr) = self.metrics_addr {
            crate::metrics::init_metrics(addr)?;
        }

        info!(?config, "Export configuration");

        let bar = (!self.no_progress && cli.output_format == OutputFormat::Human)
            .then(|| Arc::new(BarProgress::new()));
        let observer: Arc<dyn ProgressObserver> = match &bar {
            Some(bar) => bar.clone(),
            None => Arc::new(LogProgress::default()),
        };

        let executor = ExportExecutor::new(ShopFetcher::from_config(&config)?, &config)
            .with_criteria(criteria.clone())
            .with_progress(observer);

        let report = executor.run(window).await;
        if let Some(bar) = &bar {
            bar.finish();
        }

        let written = if report.is_empty() {
            None
        } else {
            let mut writer = CsvMatchWriter::new(&self.output)?;
            writer.write_matches(&report.rows)?;
            writer.close_and_sync()?;
            Some(self.output.clone())
        };

        match cli.output_format {
            OutputFormat::Json => output_json(&window, &report, written.as_ref()),
            OutputFormat::Human => output_human(&criteria, &report, written.as_ref()),
        }

        Ok(())
    }
}

/// Output result as JSON
fn output_json(window: &DateWindow, report: &ExportReport, written: Option<&PathBuf>) {
    let output = serde_json::json!({
        "success": true,
        "start_date": window.start().to_string(),
        "end_date": window.end().to_string(),
        "orders_scanned": report.orders_scanned,
        "orders_in_window": report.orders_in_window,
        "event_fetch_failures": report.event_fetch_failures,
        "matches": report.rows.len(),
        "collection_complete": report.collection_failure.is_none(),
        "collection_error": report.collection_failure.as_ref().map(|e| e.to_string()),
        "output_path": written.map(|p| p.display().to_string()),
    });

    println!("{output}");
}

/// Output result in human-readable format
fn output_human(criteria: &MatchCriteria, report: &ExportReport, written: Option<&PathBuf>) {
    if let Some(err) = &report.collection_failure {
        eprintln!("\nWarning: order list incomplete ({err}); results are partial.");
        error!("Order collection incomplete: {}", err);
    }

    match written {
        None => {
            println!(
                "\nNo order found with a comment containing '{}' by '{}'.",
                criteria.message_needle(),
                criteria.author_terms().join(" ")
            );
            warn!("Export produced no matches");
        }
        Some(path) => {
            println!("\nExport completed successfully!");
            println!("Output: {}", path.display());
            println!("Matching comments: {}", report.rows.len());
        }
    }

    println!("Orders scanned: {}", report.orders_scanned);
    println!("Orders in window: {}", report.orders_in_window);
    if report.event_fetch_failures > 0 {
        println!("Orders with failed event requests: {}", report.event_fetch_failures);
    }
}
