//! # Most Active Stocks
//!
//! A crawler that collects daily trading history for the "most active"
//! stock symbols, normalizes the scraped text into a validated dataset,
//! and writes the dataset plus descriptive statistics as CSV files.
//!
//! ## Features
//!
//! - Discovers the top-N most-active symbols from the ranking page
//! - Fetches each symbol's daily history table (sequential by default,
//!   bounded concurrency opt-in)
//! - Normalizes text cells (thousands separators, currency symbols,
//!   placeholder values) into typed prices, volumes, and dates
//! - Deduplicates and sorts into a deterministic dataset
//! - Computes per-symbol aggregates, volatility, daily returns, a
//!   cross-symbol correlation matrix, and a least-squares close trend
//! - Surfaces every skipped symbol and discarded row in `summary.json`
//!
//! ## Usage
//!
//! ```sh
//! most_active_stocks -o ./data -n 10
//! ```
//!
//! ## Architecture
//!
//! The pipeline runs in four stages:
//! 1. **Discovery**: scrape the ordered symbol list from the ranking page
//! 2. **Fetching**: download each symbol's history page (failures skip the
//!    symbol, never the run)
//! 3. **Building**: normalize, dedup, and sort into the final dataset
//! 4. **Output**: write the dataset CSV, statistics CSVs, and run summary

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod analysis;
mod cli;
mod dataset;
mod error;
mod extract;
mod fetch;
mod models;
mod normalize;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use fetch::{HttpFetcher, RetryFetch};
use models::RunSummary;
use outputs::{csv, json, stats};
use scrapers::{history, most_active};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("most_active_stocks starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let output_dir = Path::new(&args.output_dir);
    ensure_writable_dir(output_dir).await?;

    // One client for the whole run: browser-like headers, bounded timeout.
    let http = HttpFetcher::new(Duration::from_secs(args.request_timeout_secs))?;
    let fetcher = RetryFetch::new(http, args.fetch_retries, Duration::from_secs(1));

    // ---- Discovery (fatal on failure) ----
    let symbols = most_active::discover(
        &fetcher,
        &args.ranking_url,
        &args.ranking_selector,
        args.top_n,
    )
    .await?;

    // ---- Per-symbol history (failures skip the symbol) ----
    let (batches, skipped) = history::fetch_all(
        &fetcher,
        &symbols,
        &args.history_base_url,
        &args.history_selector,
        args.max_concurrent_fetches,
    )
    .await;

    // ---- Build the dataset ----
    let (dataset, report) = dataset::build(&symbols, &batches)?;

    // ---- Outputs ----
    let dataset_path = output_dir.join(csv::DATASET_FILENAME);
    csv::write_dataset(&dataset, &dataset_path)?;
    stats::write_all(&dataset, output_dir)?;

    let summary = RunSummary {
        run_date: Local::now().date_naive().to_string(),
        top_n: args.top_n,
        symbols_discovered: symbols.len(),
        symbols_fetched: symbols.len() - skipped.len(),
        symbols_skipped: skipped,
        rows_scraped: report.raw_rows,
        rows_discarded: report.discarded_rows,
        duplicates_dropped: report.duplicate_rows,
        records_written: dataset.len(),
    };
    json::write_summary(&summary, output_dir).await?;

    info!(
        symbols_fetched = summary.symbols_fetched,
        symbols_skipped = summary.symbols_skipped.len(),
        rows_discarded = summary.rows_discarded,
        records_written = summary.records_written,
        "Crawl summary"
    );

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
