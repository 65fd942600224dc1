//! Entry and exit window calculation.
//!
//! Entry: the earliest contiguous run of observations, stopped by whichever
//! cap is hit first (duration from first sighting, or observation count).
//!
//! Exit: every observation priced within the tolerance band under the peak,
//! contiguous or not. A lone peak collapses the window to a single instant.
//!
//! The two windows are computed independently. On a fast spike they can
//! overlap in time and are reported as such.

use crate::config::AnalysisConfig;
use crate::domain::{Observation, PriceWindow, Trajectory};

/// Entry window for a trajectory. `None` only for an empty trajectory.
pub fn entry_window(t: &Trajectory, config: &AnalysisConfig) -> Option<PriceWindow> {
    let deadline = t.first_seen_time + config.entry_window_duration();
    window_over(
        t.observations
            .iter()
            .take(config.entry_window_max_observations)
            .take_while(|o| o.timestamp <= deadline),
    )
}

/// Lowest price still inside the exit band.
pub fn exit_threshold(peak_price: f64, config: &AnalysisConfig) -> f64 {
    peak_price * (1.0 - config.exit_tolerance())
}

/// Exit window for a trajectory. `None` only for an empty trajectory.
pub fn exit_window(t: &Trajectory, config: &AnalysisConfig) -> Option<PriceWindow> {
    let threshold = exit_threshold(t.peak_price, config);
    window_over(t.observations.iter().filter(|o| o.price >= threshold))
}

fn window_over<'a>(mut observations: impl Iterator<Item = &'a Observation>) -> Option<PriceWindow> {
    let first = observations.next()?;
    let mut window = PriceWindow {
        start_time: first.timestamp,
        end_time: first.timestamp,
        min_price: first.price,
        max_price: first.price,
        observations: 1,
    };
    for obs in observations {
        window.start_time = window.start_time.min(obs.timestamp);
        window.end_time = window.end_time.max(obs.timestamp);
        window.min_price = window.min_price.min(obs.price);
        window.max_price = window.max_price.max(obs.price);
        window.observations += 1;
    }
    Some(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory_builder::build_trajectory;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 8)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn trajectory(points: &[(u32, u32, f64)]) -> Trajectory {
        let observations = points
            .iter()
            .map(|&(h, m, p)| Observation::new(at(h, m), "XYZ", p, 2_000_000))
            .collect();
        build_trajectory("XYZ", observations, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn xyz_entry_covers_all_three_points() {
        let t = trajectory(&[(9, 35, 2.0), (9, 40, 2.2), (9, 50, 2.5)]);
        let entry = entry_window(&t, &AnalysisConfig::default()).unwrap();
        assert_eq!(entry.start_time, at(9, 35));
        assert_eq!(entry.end_time, at(9, 50));
        assert_eq!(entry.min_price, 2.0);
        assert_eq!(entry.max_price, 2.5);
        assert_eq!(entry.observations, 3);
    }

    #[test]
    fn xyz_exit_collapses_to_peak() {
        let t = trajectory(&[(9, 35, 2.0), (9, 40, 2.2), (9, 50, 2.5)]);
        let exit = exit_window(&t, &AnalysisConfig::default()).unwrap();
        assert!(exit.is_point());
        assert_eq!(exit.start_time, at(9, 50));
        assert_eq!(exit.min_price, 2.5);
        assert_eq!(exit.observations, 1);
    }

    #[test]
    fn entry_stops_at_duration_cap() {
        let t = trajectory(&[(9, 35, 2.0), (10, 0, 2.1), (10, 5, 2.2), (10, 6, 2.3)]);
        let entry = entry_window(&t, &AnalysisConfig::default()).unwrap();
        assert_eq!(entry.end_time, at(10, 5));
        assert_eq!(entry.observations, 3);
        assert!(entry.duration() <= Duration::minutes(30));
    }

    #[test]
    fn entry_stops_at_count_cap() {
        let points: Vec<_> = (0..15).map(|i| (9, 30 + i, 2.0 + f64::from(i) * 0.01)).collect();
        let t = trajectory(&points);
        let entry = entry_window(&t, &AnalysisConfig::default()).unwrap();
        assert_eq!(entry.observations, 10);
        assert_eq!(entry.end_time, at(9, 39));
    }

    #[test]
    fn entry_is_contiguous_after_gap() {
        // A late observation past the duration cap ends the span for good.
        let t = trajectory(&[(9, 35, 2.0), (10, 30, 1.5), (10, 31, 1.4)]);
        let entry = entry_window(&t, &AnalysisConfig::default()).unwrap();
        assert_eq!(entry.observations, 1);
        assert!(entry.is_point());
    }

    #[test]
    fn exit_band_is_non_contiguous() {
        let t = trajectory(&[
            (9, 35, 2.00),
            (9, 50, 2.49),
            (10, 0, 2.30),
            (10, 10, 2.50),
            (10, 40, 2.46),
        ]);
        let exit = exit_window(&t, &AnalysisConfig::default()).unwrap();
        assert_eq!(exit.observations, 3);
        assert_eq!(exit.start_time, at(9, 50));
        assert_eq!(exit.end_time, at(10, 40));
        assert_eq!(exit.min_price, 2.46);
        assert_eq!(exit.max_price, 2.50);
    }

    #[test]
    fn exit_threshold_price_is_included() {
        let config = AnalysisConfig::default();
        let edge = exit_threshold(2.5, &config);
        let t = trajectory(&[(9, 35, 2.0), (9, 50, 2.5), (10, 0, edge)]);
        let exit = exit_window(&t, &config).unwrap();
        assert_eq!(exit.observations, 2);
        assert_eq!(exit.min_price, edge);
    }

    #[test]
    fn fast_spike_windows_overlap() {
        let t = trajectory(&[(9, 35, 2.0), (9, 41, 2.6), (9, 45, 2.58)]);
        let config = AnalysisConfig::default();
        let entry = entry_window(&t, &config).unwrap();
        let exit = exit_window(&t, &config).unwrap();
        assert!(entry.overlaps(&exit));
    }
}
