//! Command-line interface definitions.
//!
//! All runtime configuration lives here: where output goes, how many symbols
//! to crawl, network limits, and the page/selector pair for each scraped
//! table. The selector flags exist because the source markup drifts; when it
//! does, the fix is a flag, not a patch.

use clap::Parser;

use crate::scrapers::{history, most_active};

/// Command-line arguments for the most-active stocks crawler.
///
/// # Examples
///
/// ```sh
/// # Crawl the default top 10 into ./data
/// most_active_stocks -o ./data
///
/// # Top 25 with bounded concurrency and one retry per fetch
/// most_active_stocks -o ./data -n 25 --max-concurrent-fetches 4 --fetch-retries 1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the dataset, statistics, and run summary
    #[arg(short, long)]
    pub output_dir: String,

    /// How many ranked symbols to process from the most-active listing
    #[arg(short = 'n', long, default_value_t = 10)]
    pub top_n: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub request_timeout_secs: u64,

    /// Upper bound on concurrent history fetches (1 = sequential)
    #[arg(long, default_value_t = 1)]
    pub max_concurrent_fetches: usize,

    /// Retry attempts per fetch before giving up on a page (0 = no retries)
    #[arg(long, default_value_t = 0)]
    pub fetch_retries: usize,

    /// URL of the most-active ranking page
    #[arg(long, default_value = most_active::MOST_ACTIVE_URL)]
    pub ranking_url: String,

    /// CSS selector for the ranking table
    #[arg(long, default_value = most_active::RANKING_TABLE_SELECTOR)]
    pub ranking_selector: String,

    /// Base URL for per-symbol history pages
    #[arg(long, default_value = history::HISTORY_BASE_URL)]
    pub history_base_url: String,

    /// CSS selector for the history table
    #[arg(long, default_value = history::HISTORY_TABLE_SELECTOR)]
    pub history_selector: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["most_active_stocks", "--output-dir", "./data"]);

        assert_eq!(cli.output_dir, "./data");
        assert_eq!(cli.top_n, 10);
        assert_eq!(cli.request_timeout_secs, 15);
        assert_eq!(cli.max_concurrent_fetches, 1);
        assert_eq!(cli.fetch_retries, 0);
        assert_eq!(cli.ranking_url, most_active::MOST_ACTIVE_URL);
        assert_eq!(cli.history_selector, history::HISTORY_TABLE_SELECTOR);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["most_active_stocks", "-o", "/tmp/data", "-n", "25"]);

        assert_eq!(cli.output_dir, "/tmp/data");
        assert_eq!(cli.top_n, 25);
    }

    #[test]
    fn test_cli_selector_override() {
        let cli = Cli::parse_from([
            "most_active_stocks",
            "-o",
            "./data",
            "--history-selector",
            "table.quotes",
        ]);

        assert_eq!(cli.history_selector, "table.quotes");
    }
}
