//! Error taxonomy for the scraping pipeline.
//!
//! Four failure classes, each with a different recovery policy:
//!
//! - [`CrawlError::Fetch`]: the HTTP request failed (non-2xx, timeout,
//!   connection error). Fatal at the ranking-discovery stage; recovered
//!   per-symbol at the history stage.
//! - [`CrawlError::Structure`]: the expected table markup is absent or has no
//!   data rows. Same propagation policy as `Fetch`.
//! - [`CrawlError::Parse`]: a scraped cell is not convertible to its expected
//!   type. Always recovered locally by discarding the record.
//! - [`CrawlError::EmptyDataset`]: nothing survived normalization. Fatal, and
//!   distinct from `Parse` so a caller can tell "nothing useful survived"
//!   from "some rows were noisy".

use thiserror::Error;

/// Errors produced by the fetch, extract, and normalize stages.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Network or HTTP failure while fetching a page.
    #[error("request for {url} failed: {detail}")]
    Fetch { url: String, detail: String },

    /// The expected markup was missing or malformed.
    #[error("table structure error: {detail}")]
    Structure { detail: String },

    /// A scraped cell could not be converted to the expected type.
    #[error("cannot parse {kind} from {text:?}")]
    Parse { kind: &'static str, text: String },

    /// Zero records survived normalization across all symbols.
    #[error("no records survived normalization")]
    EmptyDataset,
}

impl CrawlError {
    pub fn fetch(url: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            detail: detail.to_string(),
        }
    }

    pub fn structure(detail: impl Into<String>) -> Self {
        Self::Structure {
            detail: detail.into(),
        }
    }

    pub fn parse(kind: &'static str, text: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_display_includes_url() {
        let e = CrawlError::fetch("https://example.com/most-active", "connection timed out");
        let msg = e.to_string();
        assert!(msg.contains("https://example.com/most-active"));
        assert!(msg.contains("connection timed out"));
    }

    #[test]
    fn test_parse_display_includes_offending_text() {
        let e = CrawlError::parse("decimal", "N/A");
        assert_eq!(e.to_string(), "cannot parse decimal from \"N/A\"");
    }

    #[test]
    fn test_empty_dataset_is_distinct() {
        let e = CrawlError::EmptyDataset;
        assert!(matches!(e, CrawlError::EmptyDataset));
        assert!(!matches!(e, CrawlError::Parse { .. }));
    }
}
