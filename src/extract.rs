//! Table extraction from parsed HTML documents.
//!
//! The one place in the pipeline that touches markup structure. Given a
//! parsed document and a CSS selector for the target table, it yields the
//! table's data rows as plain text cells. Cell *content* is never validated
//! here; that is [`crate::normalize`]'s job. Keeping the selector a parameter
//! means markup drift on the source site is a configuration update, not a
//! code change.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::CrawlError;

/// Extract the data rows of the first table matching `selector`.
///
/// Rows are returned in document order, one `Vec<String>` of trimmed cell
/// text per row. The header row is excluded by keeping only rows that
/// contain `td` cells.
///
/// # Errors
///
/// [`CrawlError::Structure`] when the selector is invalid, no element
/// matches it, or the matched table has zero data rows.
pub fn data_rows(document: &Html, selector: &str) -> Result<Vec<Vec<String>>, CrawlError> {
    let table_selector = Selector::parse(selector)
        .map_err(|e| CrawlError::structure(format!("invalid selector `{selector}`: {e}")))?;
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| CrawlError::structure(format!("no table matched selector `{selector}`")))?;

    let mut rows = Vec::new();
    for tr in table.select(&row_selector) {
        let cells: Vec<String> = tr.select(&cell_selector).map(cell_text).collect();
        if cells.is_empty() {
            continue;
        }
        rows.push(cells);
    }

    if rows.is_empty() {
        return Err(CrawlError::structure(format!(
            "table matching `{selector}` has no data rows"
        )));
    }
    debug!(count = rows.len(), selector, "Extracted table rows");
    Ok(rows)
}

/// Concatenated, trimmed text of one cell.
///
/// Text nodes are joined without a separator so values split across inline
/// elements (`<span>1,</span><span>234</span>`) read back as one token.
fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
