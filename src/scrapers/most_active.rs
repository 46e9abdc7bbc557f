//! Most-active ranking page scraper.
//!
//! Discovers the ordered list of symbols to crawl. The ranking table's first
//! column is the ticker; row position defines the rank. A failure here is
//! fatal for the whole run since no partial symbol list is meaningful.

use scraper::Html;
use tracing::{info, instrument, warn};

use crate::error::CrawlError;
use crate::extract;
use crate::fetch::FetchPage;
use crate::models::RankedSymbol;

/// Default URL of the most-active ranking page.
pub const MOST_ACTIVE_URL: &str = "https://finance.yahoo.com/most-active";

/// Default selector for the ranking table (first table on the page).
pub const RANKING_TABLE_SELECTOR: &str = "table";

/// Fetch the ranking page and extract the top `top_n` symbols.
///
/// If the page yields fewer than `top_n` rows, the shortfall is logged and
/// the available symbols are returned; the list is never padded.
///
/// # Errors
///
/// [`CrawlError::Fetch`] on any network/HTTP failure and
/// [`CrawlError::Structure`] when the ranking table is missing or empty.
/// Both are fatal to the run.
#[instrument(level = "info", skip_all, fields(%url, top_n))]
pub async fn discover(
    fetcher: &impl FetchPage,
    url: &str,
    selector: &str,
    top_n: usize,
) -> Result<Vec<RankedSymbol>, CrawlError> {
    let body = fetcher.fetch_page(url).await?;
    let symbols = symbols_from_html(&body, selector, top_n)?;
    info!(count = symbols.len(), "Discovered most-active symbols");
    if symbols.len() < top_n {
        warn!(
            requested = top_n,
            found = symbols.len(),
            "Ranking page yielded fewer symbols than requested; continuing with what exists"
        );
    }
    Ok(symbols)
}

/// Extract up to `top_n` ranked symbols from the ranking page body.
///
/// The symbol is the trimmed text of each row's first cell. Rows with an
/// empty first cell are skipped with a warning and do not consume a rank.
pub fn symbols_from_html(
    html: &str,
    selector: &str,
    top_n: usize,
) -> Result<Vec<RankedSymbol>, CrawlError> {
    let document = Html::parse_document(html);
    let rows = extract::data_rows(&document, selector)?;

    let mut symbols = Vec::new();
    for row in rows.into_iter().take(top_n) {
        let ticker = row[0].trim().to_string();
        if ticker.is_empty() {
            warn!("Skipping ranking row with empty symbol cell");
            continue;
        }
        symbols.push(RankedSymbol {
            ticker,
            rank: symbols.len(),
        });
    }
    Ok(symbols)
}
