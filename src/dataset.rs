//! Dataset assembly: normalization, dedup, and final ordering.
//!
//! The builder owns the only transition from [`RawRecord`] to
//! [`HistoryRecord`]. A row that fails any field is discarded and counted,
//! never silently dropped and never fatal. The run only fails here when
//! *nothing* survives, which gets its own error so callers can distinguish
//! an empty result from a noisy one.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::error::CrawlError;
use crate::models::{BuildReport, Dataset, HistoryRecord, RankedSymbol, RawRecord};
use crate::normalize;

/// Build the final dataset from per-symbol raw batches.
///
/// `batches` must arrive in symbol-rank order with each batch in document
/// order; that ordering defines which of two duplicate (symbol, date) rows
/// is kept (the first). Output records are stably sorted by (symbol rank
/// ascending, date ascending), so two runs over the same input produce
/// identical datasets.
///
/// # Errors
///
/// [`CrawlError::EmptyDataset`] when zero records survive normalization.
#[instrument(level = "info", skip_all)]
pub fn build(
    symbols: &[RankedSymbol],
    batches: &[Vec<RawRecord>],
) -> Result<(Dataset, BuildReport), CrawlError> {
    let rank_of: HashMap<&str, usize> = symbols
        .iter()
        .map(|s| (s.ticker.as_str(), s.rank))
        .collect();

    let mut raw_rows = 0usize;
    let mut discarded = 0usize;
    let mut normalized: Vec<(usize, HistoryRecord)> = Vec::new();
    for raw in batches.iter().flatten() {
        raw_rows += 1;
        let Some(&rank) = rank_of.get(raw.symbol.as_str()) else {
            warn!(symbol = %raw.symbol, "Dropping record for symbol absent from the discovery list");
            discarded += 1;
            continue;
        };
        match normalize_record(raw) {
            Ok(record) => normalized.push((rank, record)),
            Err(e) => {
                debug!(symbol = %raw.symbol, error = %e, "Discarding unparseable row");
                discarded += 1;
            }
        }
    }

    let survivors = normalized.len();
    let mut deduped: Vec<(usize, HistoryRecord)> = normalized
        .into_iter()
        .unique_by(|(_, r)| (r.symbol.clone(), r.date))
        .collect();
    let duplicates = survivors - deduped.len();
    deduped.sort_by_key(|(rank, r)| (*rank, r.date));

    let records: Vec<HistoryRecord> = deduped.into_iter().map(|(_, r)| r).collect();
    if records.is_empty() {
        return Err(CrawlError::EmptyDataset);
    }
    info!(
        records = records.len(),
        raw_rows, discarded, duplicates, "Built dataset"
    );
    Ok((
        Dataset::new(records),
        BuildReport {
            raw_rows,
            discarded_rows: discarded,
            duplicate_rows: duplicates,
        },
    ))
}

/// Normalize one raw row; any failing field fails the whole row.
fn normalize_record(raw: &RawRecord) -> Result<HistoryRecord, CrawlError> {
    let [date, open, high, low, close, adj_close, volume] = &raw.cells;
    Ok(HistoryRecord {
        symbol: raw.symbol.clone(),
        date: normalize::parse_date(date)?,
        open: normalize::parse_decimal(open)?,
        high: normalize::parse_decimal(high)?,
        low: normalize::parse_decimal(low)?,
        close: normalize::parse_decimal(close)?,
        adj_close: normalize::parse_decimal(adj_close)?,
        volume: normalize::parse_integer(volume)?,
    })
}
