//! Run summary JSON output.
//!
//! The summary is the machine-readable account of what the run did and did
//! not manage to collect: symbols skipped on fetch failure, rows discarded
//! during normalization, duplicates dropped. A run that silently omitted a
//! symbol would be indistinguishable from a shorter ranking; this file is
//! the difference.

use std::error::Error;
use std::path::Path;

use tokio::fs;
use tracing::{info, instrument};

use crate::models::RunSummary;

/// File name of the summary within the output directory.
pub const SUMMARY_FILENAME: &str = "summary.json";

/// Write the run summary to `{dir}/summary.json`.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub async fn write_summary(summary: &RunSummary, dir: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(summary)?;
    let path = dir.join(SUMMARY_FILENAME);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote run summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_summary_file_is_valid_json() {
        let summary = RunSummary {
            run_date: "2024-12-13".to_string(),
            top_n: 10,
            symbols_discovered: 10,
            symbols_fetched: 9,
            symbols_skipped: vec!["TSLA".to_string()],
            rows_scraped: 900,
            rows_discarded: 2,
            duplicates_dropped: 0,
            records_written: 898,
        };
        let dir = tempfile::tempdir().unwrap();
        write_summary(&summary, dir.path()).await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join(SUMMARY_FILENAME)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["symbols_fetched"], 9);
        assert_eq!(value["symbols_skipped"][0], "TSLA");
    }
}
