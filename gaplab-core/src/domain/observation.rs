//! One ticker's quote as printed in a single scan cycle.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single (ticker, scan cycle) sample recovered from the scanner log.
///
/// `price` and `volume` are always present. The remaining fields are whatever
/// else the scanner printed next to the ticker on that cycle; they feed the
/// open-reference policy and the scan-history drill-down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub ticker: String,
    pub price: f64,
    pub volume: u64,
    /// `open=` value printed by the scanner, if any.
    pub open: Option<f64>,
    /// `prev=` (prior close) value printed by the scanner, if any.
    pub prev_close: Option<f64>,
    /// `chg=` or `gap=` percentage printed by the scanner, if any.
    pub change_pct: Option<f64>,
    /// `score=` value printed by the scanner, if any.
    pub score: Option<f64>,
}

impl Observation {
    /// Bare observation with only the required fields set.
    pub fn new(timestamp: NaiveDateTime, ticker: impl Into<String>, price: f64, volume: u64) -> Self {
        Self {
            timestamp,
            ticker: ticker.into(),
            price,
            volume,
            open: None,
            prev_close: None,
            change_pct: None,
            score: None,
        }
    }
}
