use crate::utils::constants::{NAMESPACE_SEPARATOR, SERIES_KEY_SEPARATOR};
use chrono::NaiveDate;
use std::fmt;

/// Ticker plus country code, e.g. `COS_AR`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub ticker: String,
    pub country: String,
}

impl SeriesKey {
    pub fn new(ticker: String, country: String) -> Self {
        Self { ticker, country }
    }

    /// Namespaced identifier, e.g. `INDEC:COS_AR`.
    pub fn identifier(&self, namespace: &str) -> String {
        format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, self)
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.ticker, SERIES_KEY_SEPARATOR, self.country)
    }
}

/// One observation of an IPV series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub series: String,
    pub date: NaiveDate,
    pub kgl: f64,
    pub fob: f64,
}

impl SeriesPoint {
    pub fn ticker(&self) -> Option<&str> {
        ticker_from_identifier(&self.series)
    }

    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-01").to_string()
    }
}

/// Commodity ticker of a namespaced identifier: the text between the
/// namespace separator and the first key separator.
pub fn ticker_from_identifier(identifier: &str) -> Option<&str> {
    let (_, key) = identifier.split_once(NAMESPACE_SEPARATOR)?;
    let ticker = key.split(SERIES_KEY_SEPARATOR).next()?;
    if ticker.is_empty() {
        None
    } else {
        Some(ticker)
    }
}
