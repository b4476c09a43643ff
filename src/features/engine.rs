//! Feature engineering engine

use super::indicators::*;
use crate::data::{Dataset, Direction, Quote, DEFAULT_TICKERS};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Feature types that can be computed from daily quotes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feature {
    Open,
    High,
    Low,
    Close,
    Volume,
    /// Close-to-close return
    DailyReturn,
    /// Simple moving average of the close
    CloseSma(usize),
    /// Sample std of daily returns
    Volatility(usize),
    /// (high - low) / open
    RangePct,
}

impl Feature {
    pub fn name(&self) -> String {
        match self {
            Feature::Open => "open".to_string(),
            Feature::High => "high".to_string(),
            Feature::Low => "low".to_string(),
            Feature::Close => "close".to_string(),
            Feature::Volume => "volume".to_string(),
            Feature::DailyReturn => "daily_return".to_string(),
            Feature::CloseSma(p) => format!("sma_{}_close", p),
            Feature::Volatility(p) => format!("volatility_{}", p),
            Feature::RangePct => "range_pct".to_string(),
        }
    }
}

/// Feature engineering engine
pub struct FeatureEngine {
    features: Vec<Feature>,
    tickers: Vec<String>,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureEngine {
    /// Price, volume, return, 5/10-day close averages, 5-day volatility and range
    pub fn new() -> Self {
        Self {
            features: vec![
                Feature::Open,
                Feature::High,
                Feature::Low,
                Feature::Close,
                Feature::Volume,
                Feature::DailyReturn,
                Feature::CloseSma(5),
                Feature::CloseSma(10),
                Feature::Volatility(5),
                Feature::RangePct,
            ],
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Replace the feature list
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    /// Only use quotes of these tickers
    pub fn with_tickers(mut self, tickers: Vec<String>) -> Self {
        self.tickers = tickers;
        self
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name()).collect()
    }

    /// Build a labeled dataset from quotes.
    ///
    /// Each ticker is processed on its own in date order. A row is labeled
    /// by comparing its close with the next day's close, so the last day of
    /// every ticker is dropped, as are rows with a missing (NaN) feature.
    /// Infinite values are kept; they order like any other number.
    /// Rows come out grouped by ticker, then by date.
    pub fn generate(&self, quotes: &[Quote]) -> Dataset {
        let mut by_ticker: BTreeMap<&str, Vec<&Quote>> = BTreeMap::new();
        for quote in quotes {
            if self.tickers.iter().any(|t| *t == quote.ticker) {
                by_ticker.entry(quote.ticker.as_str()).or_default().push(quote);
            }
        }

        let mut dataset = Dataset::new(self.feature_names());
        let mut dropped = 0usize;

        for (ticker, mut series) in by_ticker {
            series.sort_by_key(|q| q.date);
            let columns = self.compute_columns(&series);

            for i in 0..series.len().saturating_sub(1) {
                let row: Vec<f64> = columns.iter().map(|c| c[i]).collect();
                if row.iter().any(|v| v.is_nan()) {
                    dropped += 1;
                    continue;
                }
                let label = Direction::from_closes(series[i].close, series[i + 1].close);
                dataset.add_sample(row, label, series[i].date);
            }

            debug!(ticker, days = series.len(), "generated features");
        }

        info!(
            samples = dataset.n_samples(),
            features = dataset.n_features(),
            dropped,
            "feature generation complete"
        );

        dataset
    }

    /// One column per configured feature, aligned with `series`
    fn compute_columns(&self, series: &[&Quote]) -> Vec<Vec<f64>> {
        let closes: Vec<f64> = series.iter().map(|q| q.close).collect();
        let returns = pct_change(&closes);

        self.features
            .iter()
            .map(|feature| match feature {
                Feature::Open => series.iter().map(|q| q.open).collect(),
                Feature::High => series.iter().map(|q| q.high).collect(),
                Feature::Low => series.iter().map(|q| q.low).collect(),
                Feature::Close => closes.clone(),
                Feature::Volume => series.iter().map(|q| q.volume).collect(),
                Feature::DailyReturn => returns.clone(),
                Feature::CloseSma(p) => sma(&closes, *p),
                Feature::Volatility(p) => rolling_std(&returns, *p),
                Feature::RangePct => series
                    .iter()
                    .map(|q| range_pct(q.open, q.high, q.low))
                    .collect(),
            })
            .collect()
    }
}
