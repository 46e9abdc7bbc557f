//! Dataset CSV writer and reader.
//!
//! One row per [`HistoryRecord`] in the dataset's final order, with the
//! header `Symbol,Date,Open,High,Low,Close,AdjClose,Volume` and dates as
//! `YYYY-MM-DD`. Floats are written in Rust's shortest round-trip form, so
//! reading a written file back yields the original values.

use std::error::Error;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::models::{Dataset, HistoryRecord};

/// File name of the dataset within the output directory.
pub const DATASET_FILENAME: &str = "most_active_history.csv";

const HEADER: [&str; 8] = [
    "Symbol", "Date", "Open", "High", "Low", "Close", "AdjClose", "Volume",
];

/// Write the dataset to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for record in dataset.records() {
        writer.write_record(&[
            record.symbol.clone(),
            record.date.to_string(),
            record.open.to_string(),
            record.high.to_string(),
            record.low.to_string(),
            record.close.to_string(),
            record.adj_close.to_string(),
            record.volume.to_string(),
        ])?;
    }
    writer.flush()?;
    info!(records = dataset.len(), "Wrote dataset CSV");
    Ok(())
}

/// Read a previously written dataset file back into records.
///
/// Row order is preserved as written. Used by consumers that reload a
/// snapshot instead of re-crawling.
pub fn read_dataset(path: &Path) -> Result<Vec<HistoryRecord>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(HistoryRecord {
            symbol: row.get(0).unwrap_or("").to_string(),
            date: NaiveDate::parse_from_str(row.get(1).unwrap_or(""), "%Y-%m-%d")?,
            open: row.get(2).unwrap_or("").parse()?,
            high: row.get(3).unwrap_or("").parse()?,
            low: row.get(4).unwrap_or("").parse()?,
            close: row.get(5).unwrap_or("").parse()?,
            adj_close: row.get(6).unwrap_or("").parse()?,
            volume: row.get(7).unwrap_or("").parse()?,
        });
    }
    Ok(records)
}
