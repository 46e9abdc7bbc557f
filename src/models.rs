//! Data models for scraped trading records and their validated representations.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`RankedSymbol`]: a ticker plus its position in the most-active ranking
//! - [`RawRecord`]: one unvalidated scraped row of text cells for one symbol
//! - [`HistoryRecord`]: a fully validated, typed daily trading record
//! - [`Dataset`]: the deduplicated, sorted collection handed to analytics
//! - [`BuildReport`] / [`RunSummary`]: counts surfaced instead of silently
//!   dropped
//!
//! Raw text flows one way: a `RawRecord` either normalizes into a
//! `HistoryRecord` or is discarded and counted. Nothing downstream of the
//! [`Dataset`] ever sees unvalidated text.

use chrono::NaiveDate;
use serde::Serialize;

/// Number of text cells in one scraped history row:
/// {Date, Open, High, Low, Close, AdjClose, Volume}.
pub const HISTORY_CELLS: usize = 7;

/// A stock ticker plus its position in the most-active ranking.
///
/// Created once at discovery time and never mutated. The rank is 0-indexed
/// and defines both fetch order and the primary sort key of the final
/// dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSymbol {
    /// The ticker text, trimmed of surrounding whitespace.
    pub ticker: String,
    /// 0-indexed position in the ranking table.
    pub rank: usize,
}

/// One scraped history row before any validation.
///
/// The cells hold raw text exactly as extracted from the page, in the fixed
/// order {Date, Open, High, Low, Close, AdjClose, Volume}. A `RawRecord`
/// is consumed exactly once: it either becomes a [`HistoryRecord`] or is
/// discarded with a counted reason.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Ticker of the symbol this row belongs to.
    pub symbol: String,
    /// Raw cell text in source column order.
    pub cells: [String; HISTORY_CELLS],
}

/// A fully validated daily trading record.
///
/// Invariant: every numeric field parsed successfully, is finite, and is
/// non-negative. A record failing any field is never constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// The deduplicated, ordered collection of [`HistoryRecord`] values.
///
/// Invariants, enforced by the builder in [`crate::dataset`]:
/// - no duplicate (symbol, date) pair
/// - every record's symbol appears in the discovery list
/// - records are ordered by (symbol rank ascending, date ascending)
///
/// The collection is read-only once built; consumers get slice access only.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<HistoryRecord>,
}

impl Dataset {
    pub(crate) fn new(records: Vec<HistoryRecord>) -> Self {
        Self { records }
    }

    /// All records in final (rank, date) order.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Counts reported by the dataset builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Raw rows received from all symbols.
    pub raw_rows: usize,
    /// Rows discarded because a field failed normalization.
    pub discarded_rows: usize,
    /// Rows dropped as duplicate (symbol, date) pairs.
    pub duplicate_rows: usize,
}

/// End-of-run summary, serialized to `summary.json` alongside the dataset.
///
/// This is how partial failures are surfaced: skipped symbols and discarded
/// rows are reported here rather than silently vanishing from the output.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// The date the crawl ran, `YYYY-MM-DD`.
    pub run_date: String,
    /// How many ranked symbols were requested.
    pub top_n: usize,
    /// How many symbols the ranking page actually yielded.
    pub symbols_discovered: usize,
    /// Symbols whose history fetch succeeded.
    pub symbols_fetched: usize,
    /// Tickers skipped because their history fetch failed.
    pub symbols_skipped: Vec<String>,
    /// Raw rows scraped across all successful symbols.
    pub rows_scraped: usize,
    /// Rows discarded during normalization.
    pub rows_discarded: usize,
    /// Duplicate (symbol, date) rows dropped.
    pub duplicates_dropped: usize,
    /// Records in the final dataset.
    pub records_written: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, date: NaiveDate) -> HistoryRecord {
        HistoryRecord {
            symbol: symbol.to_string(),
            date,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            adj_close: 1.5,
            volume: 100,
        }
    }

    #[test]
    fn test_ranked_symbol_equality() {
        let a = RankedSymbol {
            ticker: "AAPL".to_string(),
            rank: 0,
        };
        let b = RankedSymbol {
            ticker: "AAPL".to_string(),
            rank: 0,
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_dataset_exposes_records_in_insertion_order() {
        let d1 = NaiveDate::from_ymd_opt(2024, 12, 12).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 12, 13).unwrap();
        let dataset = Dataset::new(vec![record("AAPL", d1), record("AAPL", d2)]);
        assert_eq!(dataset.len(), 2);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.records()[0].date, d1);
        assert_eq!(dataset.records()[1].date, d2);
    }

    #[test]
    fn test_run_summary_serializes_skipped_symbols() {
        let summary = RunSummary {
            run_date: "2024-12-13".to_string(),
            top_n: 10,
            symbols_discovered: 10,
            symbols_fetched: 9,
            symbols_skipped: vec!["TSLA".to_string()],
            rows_scraped: 900,
            rows_discarded: 3,
            duplicates_dropped: 1,
            records_written: 896,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"symbols_skipped\":[\"TSLA\"]"));
        assert!(json.contains("\"rows_discarded\":3"));
    }
}
