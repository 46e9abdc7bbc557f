//! Per-symbol history page scraper.
//!
//! Fetches each symbol's daily-history page and maps the history table into
//! [`RawRecord`]s. Rows that are not daily quotes (dividend and split
//! notices have fewer cells) are dropped here; cell content is left raw for
//! the dataset builder to normalize.
//!
//! One symbol's failure never aborts the batch: [`fetch_all`] isolates each
//! fetch and reports skipped tickers alongside the successful batches.

use futures::stream::{self, StreamExt};
use scraper::Html;
use tracing::{debug, error, info, instrument};

use crate::error::CrawlError;
use crate::extract;
use crate::fetch::FetchPage;
use crate::models::{RankedSymbol, RawRecord, HISTORY_CELLS};

/// Default base URL for per-symbol history pages.
pub const HISTORY_BASE_URL: &str = "https://finance.yahoo.com";

/// Default selector for the history table.
pub const HISTORY_TABLE_SELECTOR: &str = "table.table.yf-j5d1ld.noDl";

/// Fetch one symbol's history page and extract its raw rows.
///
/// # Errors
///
/// [`CrawlError::Fetch`] on network/HTTP failure and
/// [`CrawlError::Structure`] when the history table is missing or empty.
/// Callers treat both as "skip this symbol".
#[instrument(level = "info", skip_all, fields(symbol = %symbol.ticker))]
pub async fn fetch_history(
    fetcher: &impl FetchPage,
    base_url: &str,
    selector: &str,
    symbol: &RankedSymbol,
) -> Result<Vec<RawRecord>, CrawlError> {
    let url = format!(
        "{}/quote/{}/history",
        base_url.trim_end_matches('/'),
        symbol.ticker
    );
    let body = fetcher.fetch_page(&url).await?;
    let records = records_from_html(&body, selector, &symbol.ticker)?;
    info!(rows = records.len(), "Fetched history rows");
    Ok(records)
}

/// Extract raw history rows from a history page body.
///
/// Rows with fewer than [`HISTORY_CELLS`] cells are discarded (dividend and
/// split notices); extra trailing cells are ignored.
pub fn records_from_html(
    html: &str,
    selector: &str,
    ticker: &str,
) -> Result<Vec<RawRecord>, CrawlError> {
    let document = Html::parse_document(html);
    let rows = extract::data_rows(&document, selector)?;

    let mut records = Vec::new();
    let mut short_rows = 0usize;
    for mut cells in rows {
        if cells.len() < HISTORY_CELLS {
            short_rows += 1;
            continue;
        }
        cells.truncate(HISTORY_CELLS);
        let cells: [String; HISTORY_CELLS] = match cells.try_into() {
            Ok(cells) => cells,
            Err(_) => continue,
        };
        records.push(RawRecord {
            symbol: ticker.to_string(),
            cells,
        });
    }
    if short_rows > 0 {
        debug!(symbol = %ticker, short_rows, "Discarded rows with too few cells");
    }
    Ok(records)
}

/// Fetch history for every symbol with bounded concurrency.
///
/// Returns the per-symbol batches in rank order plus the tickers that were
/// skipped. A failed fetch is logged and recorded; it never aborts the
/// remaining symbols, and concurrency never changes the order of the
/// returned batches.
#[instrument(level = "info", skip_all, fields(symbols = symbols.len(), max_concurrent))]
pub async fn fetch_all(
    fetcher: &impl FetchPage,
    symbols: &[RankedSymbol],
    base_url: &str,
    selector: &str,
    max_concurrent: usize,
) -> (Vec<Vec<RawRecord>>, Vec<String>) {
    let mut results: Vec<(usize, String, Result<Vec<RawRecord>, CrawlError>)> =
        stream::iter(symbols.iter().cloned())
            .map(|symbol| async move {
                let result = fetch_history(fetcher, base_url, selector, &symbol).await;
                (symbol.rank, symbol.ticker, result)
            })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;
    results.sort_by_key(|(rank, _, _)| *rank);

    let mut batches = Vec::new();
    let mut skipped = Vec::new();
    for (_, ticker, result) in results {
        match result {
            Ok(batch) => batches.push(batch),
            Err(e) => {
                error!(symbol = %ticker, error = %e, "History fetch failed; skipping symbol");
                skipped.push(ticker);
            }
        }
    }
    info!(
        succeeded = batches.len(),
        skipped = skipped.len(),
        "History fetching complete"
    );
    (batches, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY_PAGE: &str = r#"
        <html><body>
          <table class="table yf-j5d1ld noDl">
            <tr><th>Date</th><th>Open</th><th>High</th><th>Low</th>
                <th>Close</th><th>Adj Close</th><th>Volume</th></tr>
            <tr><td>Dec 13, 2024</td><td>247.82</td><td>249.29</td><td>246.24</td>
                <td>248.13</td><td>248.13</td><td>33,155,300</td></tr>
            <tr><td>Nov 8, 2024</td><td>0.25 Dividend</td></tr>
            <tr><td>Dec 12, 2024</td><td>246.89</td><td>248.74</td><td>245.68</td>
                <td>247.96</td><td>247.96</td><td>32,777,500</td></tr>
            <tr><td>Dec 11, 2024</td><td>247.96</td><td>250.80</td><td>246.26</td>
                <td>246.49</td><td>246.49</td><td>45,205,800</td></tr>
          </table>
        </body></html>"#;

    #[test]
    fn test_rows_become_raw_records_tagged_with_symbol() {
        let records = records_from_html(HISTORY_PAGE, HISTORY_TABLE_SELECTOR, "AAPL").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].symbol, "AAPL");
        assert_eq!(records[0].cells[0], "Dec 13, 2024");
        assert_eq!(records[0].cells[6], "33,155,300");
        assert_eq!(records[1].cells[0], "Dec 12, 2024");
    }

    #[test]
    fn test_short_rows_discarded() {
        let records = records_from_html(HISTORY_PAGE, HISTORY_TABLE_SELECTOR, "AAPL").unwrap();
        assert!(records.iter().all(|r| r.cells[0] != "Nov 8, 2024"));
    }

    #[test]
    fn test_missing_history_table_is_structure_error() {
        let err = records_from_html(
            "<html><body><table><tr><td>x</td></tr></table></body></html>",
            HISTORY_TABLE_SELECTOR,
            "AAPL",
        )
        .unwrap_err();
        assert!(matches!(err, CrawlError::Structure { .. }));
    }

    /// Serves a canned history page for AAPL and times out for everything else.
    struct StubFetcher;

    impl FetchPage for StubFetcher {
        async fn fetch_page(&self, url: &str) -> Result<String, CrawlError> {
            if url.contains("/quote/AAPL/") {
                Ok(HISTORY_PAGE.to_string())
            } else {
                Err(CrawlError::fetch(url, "operation timed out"))
            }
        }
    }

    fn symbols() -> Vec<RankedSymbol> {
        vec![
            RankedSymbol {
                ticker: "AAPL".to_string(),
                rank: 0,
            },
            RankedSymbol {
                ticker: "TSLA".to_string(),
                rank: 1,
            },
        ]
    }

    #[tokio::test]
    async fn test_one_failed_symbol_does_not_abort_the_rest() {
        let symbols = symbols();
        let (batches, skipped) = fetch_all(
            &StubFetcher,
            &symbols,
            HISTORY_BASE_URL,
            HISTORY_TABLE_SELECTOR,
            1,
        )
        .await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
        assert_eq!(batches[0][0].symbol, "AAPL");
        assert_eq!(skipped, vec!["TSLA".to_string()]);

        // The surviving batch builds a dataset covering only the fetched symbol.
        let (dataset, report) = crate::dataset::build(&symbols, &batches).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(dataset.records().iter().all(|r| r.symbol == "AAPL"));
        assert_eq!(report.discarded_rows, 0);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_preserve_rank_order() {
        let mut symbols = symbols();
        symbols.reverse();
        for (rank, s) in symbols.iter_mut().enumerate() {
            s.rank = rank;
        }
        // TSLA is now rank 0; its failure must not displace AAPL's batch.
        let (batches, skipped) = fetch_all(
            &StubFetcher,
            &symbols,
            HISTORY_BASE_URL,
            HISTORY_TABLE_SELECTOR,
            8,
        )
        .await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0][0].symbol, "AAPL");
        assert_eq!(skipped, vec!["TSLA".to_string()]);
    }
}
