//! Descriptive statistics over the finished dataset.
//!
//! Every function here is pure: dataset in, values out. Nothing in this
//! module touches the network or the filesystem; the writers in
//! [`crate::outputs`] persist the results. All computations rely on the
//! dataset's ordering invariant (symbol rank, then date ascending), which is
//! what makes per-symbol grouping a single pass.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{Dataset, HistoryRecord};

/// Per-symbol aggregate statistics over Open, Close, and Volume.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolAggregate {
    pub symbol: String,
    pub open_mean: f64,
    pub open_max: f64,
    pub open_min: f64,
    pub close_mean: f64,
    pub close_max: f64,
    pub close_min: f64,
    pub volume_total: u64,
}

/// A per-symbol scalar statistic; `None` when the symbol has too few records.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolStat {
    pub symbol: String,
    pub value: Option<f64>,
}

/// Pearson correlation of closing prices across symbols.
///
/// `values[i][j]` is the correlation between `symbols[i]` and `symbols[j]`
/// over their shared dates, or `None` when fewer than two dates are shared
/// or one side has zero variance.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// Per-symbol least-squares trend of Close against the day index,
/// with a one-step-ahead projection.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseTrend {
    pub symbol: String,
    pub slope: f64,
    pub intercept: f64,
    pub projected_close: f64,
}

/// Group the dataset's records per symbol, preserving rank order.
fn symbol_groups(dataset: &Dataset) -> Vec<&[HistoryRecord]> {
    dataset
        .records()
        .chunk_by(|a, b| a.symbol == b.symbol)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Open mean/max/min, Close mean/max/min, and total Volume per symbol.
pub fn aggregates(dataset: &Dataset) -> Vec<SymbolAggregate> {
    symbol_groups(dataset)
        .into_iter()
        .map(|group| {
            let opens: Vec<f64> = group.iter().map(|r| r.open).collect();
            let closes: Vec<f64> = group.iter().map(|r| r.close).collect();
            SymbolAggregate {
                symbol: group[0].symbol.clone(),
                open_mean: mean(&opens),
                open_max: opens.iter().copied().fold(f64::MIN, f64::max),
                open_min: opens.iter().copied().fold(f64::MAX, f64::min),
                close_mean: mean(&closes),
                close_max: closes.iter().copied().fold(f64::MIN, f64::max),
                close_min: closes.iter().copied().fold(f64::MAX, f64::min),
                volume_total: group.iter().map(|r| r.volume).sum(),
            }
        })
        .collect()
}

/// Sample standard deviation of Close per symbol (n−1 denominator).
///
/// `None` for symbols with fewer than two records.
pub fn volatility(dataset: &Dataset) -> Vec<SymbolStat> {
    symbol_groups(dataset)
        .into_iter()
        .map(|group| {
            let closes: Vec<f64> = group.iter().map(|r| r.close).collect();
            let value = if closes.len() < 2 {
                None
            } else {
                let m = mean(&closes);
                let ss: f64 = closes.iter().map(|c| (c - m).powi(2)).sum();
                Some((ss / (closes.len() - 1) as f64).sqrt())
            };
            SymbolStat {
                symbol: group[0].symbol.clone(),
                value,
            }
        })
        .collect()
}

/// Mean daily return per symbol: average close-over-close percent change.
///
/// Pairs whose ratio is not finite (a zero prior close) are skipped. `None`
/// for symbols without at least one usable consecutive pair.
pub fn mean_daily_returns(dataset: &Dataset) -> Vec<SymbolStat> {
    symbol_groups(dataset)
        .into_iter()
        .map(|group| {
            let returns: Vec<f64> = group
                .windows(2)
                .map(|w| (w[1].close - w[0].close) / w[0].close)
                .filter(|r| r.is_finite())
                .collect();
            SymbolStat {
                symbol: group[0].symbol.clone(),
                value: (!returns.is_empty()).then(|| mean(&returns)),
            }
        })
        .collect()
}

/// Pairwise Pearson correlation of Close, pivoted by date.
///
/// Only dates present for both symbols contribute to a pair's coefficient,
/// matching a pivot-then-correlate over pairwise-complete observations.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let groups = symbol_groups(dataset);
    let symbols: Vec<String> = groups.iter().map(|g| g[0].symbol.clone()).collect();
    let by_date: Vec<BTreeMap<NaiveDate, f64>> = groups
        .iter()
        .map(|g| g.iter().map(|r| (r.date, r.close)).collect())
        .collect();

    let values = (0..symbols.len())
        .map(|i| {
            (0..symbols.len())
                .map(|j| {
                    if i == j {
                        return Some(1.0);
                    }
                    let (xs, ys): (Vec<f64>, Vec<f64>) = by_date[i]
                        .iter()
                        .filter_map(|(date, x)| by_date[j].get(date).map(|y| (*x, *y)))
                        .unzip();
                    pearson(&xs, &ys)
                })
                .collect()
        })
        .collect();

    CorrelationMatrix { symbols, values }
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Least-squares Close trend per symbol with a next-day projection.
///
/// Regresses Close on the 0-based day index of each symbol's chronological
/// records. Symbols with fewer than two records are omitted.
pub fn close_trend(dataset: &Dataset) -> Vec<CloseTrend> {
    symbol_groups(dataset)
        .into_iter()
        .filter(|group| group.len() >= 2)
        .map(|group| {
            let closes: Vec<f64> = group.iter().map(|r| r.close).collect();
            let n = closes.len() as f64;
            let x_bar = (n - 1.0) / 2.0;
            let y_bar = mean(&closes);
            let mut sxy = 0.0;
            let mut sxx = 0.0;
            for (i, y) in closes.iter().enumerate() {
                let dx = i as f64 - x_bar;
                sxy += dx * (y - y_bar);
                sxx += dx * dx;
            }
            let slope = sxy / sxx;
            let intercept = y_bar - slope * x_bar;
            CloseTrend {
                symbol: group[0].symbol.clone(),
                slope,
                intercept,
                projected_close: intercept + slope * n,
            }
        })
        .collect()
}
