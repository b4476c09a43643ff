//! Daily quotes and the Bovespa CSV loader

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// One trading day of one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub date: NaiveDate,
    pub ticker: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Row as it appears in the CSV, before parsing numbers and dates
#[derive(Debug, Deserialize)]
struct RawQuote {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Open")]
    open: String,
    #[serde(rename = "High")]
    high: String,
    #[serde(rename = "Low")]
    low: String,
    #[serde(rename = "Close")]
    close: String,
    #[serde(rename = "Volume")]
    volume: String,
}

/// Tickers used when none are given
pub const DEFAULT_TICKERS: [&str; 2] = ["PETR3", "PETR4"];

/// Data loader for Bovespa quote files
pub struct QuoteLoader;

impl QuoteLoader {
    /// Load quotes for `tickers` from a Bovespa CSV.
    ///
    /// Dates are day-first, numbers may use a decimal comma. Rows with an
    /// unparseable price or volume are dropped; a bad date is an error.
    /// The result is sorted by ticker, then date.
    pub fn load_bovespa<P: AsRef<Path>>(path: P, tickers: &[String]) -> Result<Vec<Quote>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;

        let mut reader = csv::Reader::from_reader(file);
        let mut quotes = Vec::new();
        let mut dropped = 0usize;

        for (line, result) in reader.deserialize().enumerate() {
            let raw: RawQuote = result.with_context(|| format!("Failed to parse row {}", line + 1))?;
            let ticker = raw.ticker.trim();
            if !tickers.iter().any(|t| t == ticker) {
                continue;
            }

            let date = parse_date(&raw.date)
                .with_context(|| format!("Invalid date on row {}", line + 1))?;

            let fields = [&raw.open, &raw.high, &raw.low, &raw.close, &raw.volume];
            let values: Option<Vec<f64>> = fields.iter().map(|s| parse_decimal(s)).collect();

            match values.as_deref() {
                Some(&[open, high, low, close, volume]) => quotes.push(Quote {
                    date,
                    ticker: ticker.to_string(),
                    open,
                    high,
                    low,
                    close,
                    volume,
                }),
                _ => {
                    debug!(row = line + 1, ticker, "dropping row with non-numeric fields");
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            warn!(dropped, "rows dropped for non-numeric prices or volume");
        }

        quotes.sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.date.cmp(&b.date)));
        info!(quotes = quotes.len(), tickers = ?tickers, "loaded quotes");

        Ok(quotes)
    }
}

/// Parse a number written with either a decimal comma or a decimal point
pub fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a day-first date (`31/12/2020`), falling back to ISO (`2020-12-31`)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    for format in ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    bail!("unrecognized date `{}`", s)
}
