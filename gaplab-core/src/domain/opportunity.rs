//! Analyzer outputs: ranked opportunities and rejection diagnostics.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{PriceWindow, Trajectory};

/// A trajectory that passed every catchability rule, with its trade windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchableOpportunity {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub trajectory: Trajectory,
    pub entry_window: PriceWindow,
    pub exit_window: PriceWindow,
}

impl CatchableOpportunity {
    pub fn ticker(&self) -> &str {
        &self.trajectory.ticker
    }

    pub fn gain_pct(&self) -> f64 {
        self.trajectory.gain_pct
    }

    /// Fast spike: the entry and exit windows share time.
    pub fn windows_overlap(&self) -> bool {
        self.entry_window.overlaps(&self.exit_window)
    }
}

/// Why a trajectory was not catchable. Ordered the way the rules run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionReason {
    /// Fewer than two observations.
    InsufficientData,
    /// First seen at or after the late-day cutoff.
    LateDay,
    /// Max volume below the liquidity floor.
    Illiquid,
    /// Peak came too soon after the first sighting to react.
    NoReactionTime,
    /// Gain below the configured minimum.
    BelowMinGain,
}

impl RejectionReason {
    pub const ALL: [RejectionReason; 5] = [
        RejectionReason::InsufficientData,
        RejectionReason::LateDay,
        RejectionReason::Illiquid,
        RejectionReason::NoReactionTime,
        RejectionReason::BelowMinGain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::InsufficientData => "insufficient-data",
            RejectionReason::LateDay => "late-day",
            RejectionReason::Illiquid => "illiquid",
            RejectionReason::NoReactionTime => "no-reaction-time",
            RejectionReason::BelowMinGain => "below-min-gain",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic record for a trajectory the filter turned away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub ticker: String,
    pub reason: RejectionReason,
    pub gain_pct: f64,
    pub first_seen_time: NaiveDateTime,
    pub peak_time: NaiveDateTime,
    pub max_volume: u64,
    pub observations: usize,
}

impl Rejection {
    pub fn new(trajectory: &Trajectory, reason: RejectionReason) -> Self {
        Self {
            ticker: trajectory.ticker.clone(),
            reason,
            gain_pct: trajectory.gain_pct,
            first_seen_time: trajectory.first_seen_time,
            peak_time: trajectory.peak_time,
            max_volume: trajectory.max_volume,
            observations: trajectory.observations.len(),
        }
    }
}
