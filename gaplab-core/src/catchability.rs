//! Catchability filter: was a move realistically tradable?
//!
//! Rules run in a fixed order and the first failure is the reported reason:
//! 1. at least two observations
//! 2. first seen before the late-day cutoff
//! 3. max volume at or above the liquidity floor
//! 4. peak at least `min_reaction_minutes` after first sighting
//! 5. gain at or above `min_gain_pct`

use crate::config::AnalysisConfig;
use crate::domain::{RejectionReason, Trajectory};

/// Applies the catchability rules for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct CatchabilityFilter<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> CatchabilityFilter<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// `Ok(())` if catchable, otherwise the first rule that failed.
    pub fn check(&self, t: &Trajectory) -> Result<(), RejectionReason> {
        if t.insufficient_data {
            return Err(RejectionReason::InsufficientData);
        }
        if t.first_seen_time.time() >= self.config.late_day_cutoff {
            return Err(RejectionReason::LateDay);
        }
        if t.max_volume < self.config.liquidity_floor {
            return Err(RejectionReason::Illiquid);
        }
        if t.time_to_peak() < self.config.min_reaction() {
            return Err(RejectionReason::NoReactionTime);
        }
        if t.gain_pct < self.config.min_gain_pct {
            return Err(RejectionReason::BelowMinGain);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use crate::trajectory_builder::build_trajectory;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 8)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn trajectory(points: &[(u32, u32, f64)], volume: u64) -> Trajectory {
        let observations = points
            .iter()
            .map(|&(h, m, p)| Observation::new(at(h, m), "XYZ", p, volume))
            .collect();
        build_trajectory("XYZ", observations, &AnalysisConfig::default()).unwrap()
    }

    fn check(t: &Trajectory) -> Result<(), RejectionReason> {
        let config = AnalysisConfig::default();
        CatchabilityFilter::new(&config).check(t)
    }

    #[test]
    fn good_runner_passes() {
        let t = trajectory(&[(9, 35, 2.0), (9, 40, 2.2), (9, 50, 2.5)], 2_000_000);
        assert_eq!(check(&t), Ok(()));
    }

    #[test]
    fn single_observation_is_insufficient() {
        let t = trajectory(&[(9, 35, 2.0)], 2_000_000);
        assert_eq!(check(&t), Err(RejectionReason::InsufficientData));
    }

    #[test]
    fn cutoff_is_exclusive() {
        let t = trajectory(&[(14, 0, 2.0), (14, 30, 2.5)], 2_000_000);
        assert_eq!(check(&t), Err(RejectionReason::LateDay));

        let t = trajectory(&[(13, 59, 2.0), (14, 30, 2.5)], 2_000_000);
        assert_eq!(check(&t), Ok(()));
    }

    #[test]
    fn illiquid_beats_later_rules() {
        // Also a no-reaction move and below min gain; liquidity is checked first.
        let t = trajectory(&[(9, 35, 2.0), (9, 36, 2.01)], 500_000);
        assert_eq!(check(&t), Err(RejectionReason::Illiquid));
    }

    #[test]
    fn liquidity_floor_is_inclusive() {
        let t = trajectory(&[(9, 35, 2.0), (9, 50, 2.5)], 1_000_000);
        assert_eq!(check(&t), Ok(()));
    }

    #[test]
    fn reaction_gap_boundary() {
        let t = trajectory(&[(9, 35, 2.0), (9, 39, 2.5)], 2_000_000);
        assert_eq!(check(&t), Err(RejectionReason::NoReactionTime));

        let t = trajectory(&[(9, 35, 2.0), (9, 40, 2.5)], 2_000_000);
        assert_eq!(check(&t), Ok(()));
    }

    #[test]
    fn small_move_is_below_min_gain() {
        let t = trajectory(&[(9, 35, 2.0), (9, 50, 2.1)], 2_000_000);
        assert_eq!(check(&t), Err(RejectionReason::BelowMinGain));
    }

    #[test]
    fn min_gain_is_inclusive() {
        let t = trajectory(&[(9, 35, 2.0), (9, 50, 2.16)], 2_000_000);
        let config = AnalysisConfig {
            min_gain_pct: t.gain_pct,
            ..AnalysisConfig::default()
        };
        assert_eq!(CatchabilityFilter::new(&config).check(&t), Ok(()));
    }
}
