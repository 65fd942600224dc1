//! One ticker's ordered path through the day's scan log.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Observation;

/// Where a trajectory's `open_price` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenSource {
    /// Price of the first observation.
    FirstSeen,
    /// `open=` value printed by the scanner.
    LoggedOpen,
    /// `prev=` value printed by the scanner.
    PriorClose,
    /// Supplied by the caller for this ticker.
    External,
}

/// Per-ticker summary derived from its chronologically ordered observations.
///
/// Invariants:
/// - `observations` is non-empty and sorted by timestamp (stable on ties).
/// - `peak_time` is the timestamp of the earliest observation carrying
///   `peak_price`, the maximum observed price.
/// - `first_seen_time <= peak_time <= last_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub ticker: String,
    pub observations: Vec<Observation>,
    pub open_price: f64,
    pub open_source: OpenSource,
    pub first_seen_time: NaiveDateTime,
    pub first_seen_price: f64,
    pub peak_time: NaiveDateTime,
    pub peak_price: f64,
    pub last_time: NaiveDateTime,
    pub last_price: f64,
    pub max_volume: u64,
    pub gain_pct: f64,
    /// Fewer than two observations; kept for diagnostics, never catchable.
    pub insufficient_data: bool,
}

impl Trajectory {
    /// Time between first sighting and the peak.
    pub fn time_to_peak(&self) -> Duration {
        self.peak_time - self.first_seen_time
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Gain from the first sighting to the peak, ignoring the open reference.
    pub fn first_seen_gain_pct(&self) -> f64 {
        crate::gap::gap_pct(self.first_seen_price, self.peak_price)
    }
}
