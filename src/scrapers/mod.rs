//! Scrapers for the two pages the pipeline consumes.
//!
//! # Pages
//!
//! | Page | Module | Yields |
//! |------|--------|--------|
//! | Most-active ranking | [`most_active`] | ordered top-N [`crate::models::RankedSymbol`] list |
//! | Per-symbol history | [`history`] | [`crate::models::RawRecord`] rows tagged with the symbol |
//!
//! # Common Patterns
//!
//! Each scraper splits into an async fetch entry point taking an
//! `&impl FetchPage` and a synchronous `*_from_html` parsing helper, so the
//! parsing logic is testable on fixture HTML without any network.
//!
//! Failure policy differs by page: a ranking failure is fatal for the run,
//! while a history failure skips that one symbol and the run continues.

pub mod history;
pub mod most_active;
