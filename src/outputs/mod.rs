//! Output writers for the dataset, the statistics, and the run summary.
//!
//! # Submodules
//!
//! - [`csv`]: the dataset itself, one row per validated record, plus a
//!   reader for consumers that reload a written snapshot
//! - [`stats`]: the analytics files derived from the dataset
//! - [`json`]: the end-of-run summary
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── most_active_history.csv   # the dataset
//! ├── grouped_data.csv          # per-symbol aggregates
//! ├── volatility.csv            # stddev of Close per symbol
//! ├── correlation_matrix.csv    # symbol x symbol Close correlation
//! ├── daily_return_mean.csv     # mean daily return per symbol
//! ├── close_trend.csv           # OLS trend + next-day projection
//! └── summary.json              # run summary incl. skip/discard counts
//! ```

pub mod csv;
pub mod json;
pub mod stats;
