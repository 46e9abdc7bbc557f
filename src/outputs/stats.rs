//! Writers for the statistics derived from the dataset.
//!
//! Each statistic gets its own small CSV next to the dataset. Missing values
//! (too few records, insufficient overlap) are written as empty cells.

use std::error::Error;
use std::path::Path;

use tracing::{info, instrument};

use crate::analysis::{self, CloseTrend, CorrelationMatrix, SymbolAggregate, SymbolStat};
use crate::models::Dataset;

/// Compute every statistic and write its file into `dir`.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub fn write_all(dataset: &Dataset, dir: &Path) -> Result<(), Box<dyn Error>> {
    write_aggregates(&analysis::aggregates(dataset), &dir.join("grouped_data.csv"))?;
    write_symbol_stat(
        &analysis::volatility(dataset),
        "CloseStdDev",
        &dir.join("volatility.csv"),
    )?;
    write_symbol_stat(
        &analysis::mean_daily_returns(dataset),
        "MeanDailyReturn",
        &dir.join("daily_return_mean.csv"),
    )?;
    write_correlation(
        &analysis::correlation_matrix(dataset),
        &dir.join("correlation_matrix.csv"),
    )?;
    write_close_trend(&analysis::close_trend(dataset), &dir.join("close_trend.csv"))?;
    info!("Wrote statistics files");
    Ok(())
}

fn write_aggregates(aggregates: &[SymbolAggregate], path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Symbol",
        "OpenMean",
        "OpenMax",
        "OpenMin",
        "CloseMean",
        "CloseMax",
        "CloseMin",
        "VolumeTotal",
    ])?;
    for agg in aggregates {
        writer.write_record(&[
            agg.symbol.clone(),
            agg.open_mean.to_string(),
            agg.open_max.to_string(),
            agg.open_min.to_string(),
            agg.close_mean.to_string(),
            agg.close_max.to_string(),
            agg.close_min.to_string(),
            agg.volume_total.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_symbol_stat(
    stats: &[SymbolStat],
    value_header: &str,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Symbol", value_header])?;
    for stat in stats {
        writer.write_record(&[stat.symbol.clone(), optional(stat.value)])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_correlation(matrix: &CorrelationMatrix, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec!["Symbol".to_string()];
    header.extend(matrix.symbols.iter().cloned());
    writer.write_record(&header)?;
    for (symbol, row) in matrix.symbols.iter().zip(&matrix.values) {
        let mut cells = vec![symbol.clone()];
        cells.extend(row.iter().map(|v| optional(*v)));
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_close_trend(trends: &[CloseTrend], path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Symbol", "Slope", "Intercept", "ProjectedClose"])?;
    for trend in trends {
        writer.write_record(&[
            trend.symbol.clone(),
            trend.slope.to_string(),
            trend.intercept.to_string(),
            trend.projected_close.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryRecord;
    use chrono::NaiveDate;

    fn record(symbol: &str, day: u32, close: f64) -> HistoryRecord {
        HistoryRecord {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 12, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            adj_close: close,
            volume: 100,
        }
    }

    #[test]
    fn test_write_all_produces_every_file() {
        let dataset = Dataset::new(vec![
            record("NVDA", 12, 137.34),
            record("NVDA", 13, 134.25),
            record("AAPL", 12, 247.96),
            record("AAPL", 13, 248.13),
        ]);
        let dir = tempfile::tempdir().unwrap();
        write_all(&dataset, dir.path()).unwrap();

        for name in [
            "grouped_data.csv",
            "volatility.csv",
            "daily_return_mean.csv",
            "correlation_matrix.csv",
            "close_trend.csv",
        ] {
            assert!(dir.path().join(name).exists(), "missing {name}");
        }
    }

    #[test]
    fn test_missing_values_written_as_empty_cells() {
        // A single record per symbol has no volatility or returns.
        let dataset = Dataset::new(vec![record("NVDA", 12, 137.34)]);
        let dir = tempfile::tempdir().unwrap();
        write_all(&dataset, dir.path()).unwrap();

        let volatility = std::fs::read_to_string(dir.path().join("volatility.csv")).unwrap();
        assert!(volatility.lines().any(|l| l == "NVDA,"));
    }

    #[test]
    fn test_correlation_matrix_is_square_with_symbol_header() {
        let dataset = Dataset::new(vec![
            record("NVDA", 12, 1.0),
            record("NVDA", 13, 2.0),
            record("AAPL", 12, 2.0),
            record("AAPL", 13, 4.0),
        ]);
        let dir = tempfile::tempdir().unwrap();
        write_all(&dataset, dir.path()).unwrap();

        let contents =
            std::fs::read_to_string(dir.path().join("correlation_matrix.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "Symbol,NVDA,AAPL");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("NVDA,1,"));
    }
}
