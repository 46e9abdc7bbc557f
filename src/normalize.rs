//! Normalization of raw scraped cell text into typed values.
//!
//! Scraped cells are messy: thousands separators (`"1,234.56"`), leading
//! currency symbols, trailing footnote markers, placeholder text (`"N/A"`,
//! `"-"`), and stray whitespace. The functions here convert that text into
//! `f64` prices, `u64` volumes, and calendar dates, or fail with
//! [`CrawlError::Parse`]. They are pure and side-effect free; callers decide
//! what a failure means (the dataset builder discards and counts).
//!
//! # Policy
//!
//! - Commas are stripped before extraction, so `"1,234.56"` reads as
//!   `1234.56`.
//! - Extraction takes the first contiguous numeric substring, which skips
//!   currency prefixes and footnote suffixes without listing them.
//! - Negative values are rejected; the source publishes no legitimate
//!   negative prices or volumes, so a minus sign means corrupt markup.
//! - Integer cells reject a decimal point outright: `"1,234.56"` as a volume
//!   is an error, never a silent truncation to `1234`.
//! - Dates accept exactly one format, `"%b %d, %Y"` (e.g. `"Dec 13, 2024"`).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CrawlError;

static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").unwrap());

/// Accepted date format of the history table, e.g. `"Dec 13, 2024"`.
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// Parse a price-like cell into a non-negative finite `f64`.
///
/// # Errors
///
/// [`CrawlError::Parse`] when the text contains no numeric substring, the
/// extracted value is negative, or it does not fit a finite `f64`.
pub fn parse_decimal(text: &str) -> Result<f64, CrawlError> {
    let stripped = text.replace(',', "");
    let matched = DECIMAL_RE
        .find(&stripped)
        .ok_or_else(|| CrawlError::parse("decimal", text))?;
    let value: f64 = matched
        .as_str()
        .parse()
        .map_err(|_| CrawlError::parse("decimal", text))?;
    if value < 0.0 || !value.is_finite() {
        return Err(CrawlError::parse("decimal", text));
    }
    Ok(value)
}

/// Parse a count-like cell (volume) into a `u64`.
///
/// A digit run immediately followed by a decimal point is rejected rather
/// than truncated, so `"1,234.56"` fails while `"12,345"` parses to `12345`.
///
/// # Errors
///
/// [`CrawlError::Parse`] when no digit run is found, the value is negative,
/// a decimal point follows the digits, or the digits overflow `u64`.
pub fn parse_integer(text: &str) -> Result<u64, CrawlError> {
    let stripped = text.replace(',', "");
    let matched = INTEGER_RE
        .find(&stripped)
        .ok_or_else(|| CrawlError::parse("integer", text))?;
    if matched.as_str().starts_with('-') {
        return Err(CrawlError::parse("integer", text));
    }
    if stripped[matched.end()..].starts_with('.') {
        return Err(CrawlError::parse("integer", text));
    }
    matched
        .as_str()
        .parse()
        .map_err(|_| CrawlError::parse("integer", text))
}

/// Parse a date cell in the fixed [`DATE_FORMAT`].
///
/// # Errors
///
/// [`CrawlError::Parse`] on any other format, including ISO dates.
pub fn parse_date(text: &str) -> Result<NaiveDate, CrawlError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| CrawlError::parse("date", text))
}
