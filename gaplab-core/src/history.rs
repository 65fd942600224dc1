//! Per-ticker appearance stats for drill-down and threshold calibration.
//!
//! Answers the questions the EOD ranking does not: how often did a ticker
//! show up, when was it first seen, and how far did it run from there.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::domain::{Observation, Trajectory};
use crate::trajectory_builder::build_trajectories;

/// A ticker whose first-seen → peak gain cleared a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub ticker: String,
    pub gain_pct: f64,
    pub first_price: f64,
    pub peak_price: f64,
}

/// All tickers seen in one log, as time-ordered trajectories.
#[derive(Debug, Clone, Default)]
pub struct ScanHistory {
    trajectories: Vec<Trajectory>,
}

impl ScanHistory {
    pub fn from_observations(observations: &[Observation]) -> Self {
        Self {
            trajectories: build_trajectories(observations, &AnalysisConfig::default()),
        }
    }

    pub fn ticker_count(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Full trajectory for one ticker.
    pub fn timeline(&self, ticker: &str) -> Option<&Trajectory> {
        self.trajectories.iter().find(|t| t.ticker == ticker)
    }

    pub fn appearances(&self, ticker: &str) -> usize {
        self.timeline(ticker).map_or(0, |t| t.observations.len())
    }

    /// Tickers by appearance count, most frequent first.
    pub fn most_frequent(&self, n: usize) -> Vec<(String, usize)> {
        let mut counts: Vec<_> = self
            .trajectories
            .iter()
            .map(|t| (t.ticker.clone(), t.observations.len()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(n);
        counts
    }

    /// Tickers that gained at least `min_gain_pct` from first sighting to peak.
    pub fn best_performers(&self, min_gain_pct: f64) -> Vec<Performer> {
        let mut performers: Vec<_> = self
            .trajectories
            .iter()
            .map(|t| Performer {
                ticker: t.ticker.clone(),
                gain_pct: t.first_seen_gain_pct(),
                first_price: t.first_seen_price,
                peak_price: t.peak_price,
            })
            .filter(|p| p.gain_pct >= min_gain_pct)
            .collect();
        performers.sort_by(|a, b| {
            b.gain_pct
                .total_cmp(&a.gain_pct)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });
        performers
    }
}
