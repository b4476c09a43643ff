//! Data structures and loading module
//!
//! Provides daily quotes, the Bovespa CSV loader and the ML dataset type.

mod dataset;
mod quote;

pub use dataset::{Dataset, Direction, Split};
pub use quote::{parse_date, parse_decimal, Quote, QuoteLoader, DEFAULT_TICKERS};
