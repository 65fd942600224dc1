//! Property tests for analyzer invariants.
//!
//! Uses proptest to verify:
//! 1. Peak — `peak_time` is the earliest timestamp carrying the max price
//! 2. Entry caps — duration and observation count never exceed the config
//! 3. Exit band — contains exactly the observations at or above the threshold
//! 4. Ranking — gains non-increasing, ranks 1..=n
//! 5. Idempotence — same log and config, same report

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use gaplab_core::ranker::gain_key;
use gaplab_core::trajectory_builder::build_trajectory;
use gaplab_core::windows::{entry_window, exit_threshold, exit_window};
use gaplab_core::{AnalysisConfig, EodAnalyzer, Observation};

// ── Strategies (proptest) ────────────────────────────────────────────

fn open_bell() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, 8)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..50.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// Minute gaps between consecutive samples (0 = same scan cycle).
fn arb_series() -> impl Strategy<Value = Vec<(i64, f64, u64)>> {
    prop::collection::vec((0..12_i64, arb_price(), 100_000..5_000_000_u64), 1..40)
}

fn to_observations(ticker: &str, series: &[(i64, f64, u64)]) -> Vec<Observation> {
    let mut ts = open_bell();
    series
        .iter()
        .map(|&(gap, price, volume)| {
            ts += Duration::minutes(gap);
            Observation::new(ts, ticker, price, volume)
        })
        .collect()
}

fn arb_config() -> impl Strategy<Value = AnalysisConfig> {
    (1..90_u32, 1..20_usize, 0.0..10.0_f64).prop_map(|(minutes, count, tolerance)| {
        AnalysisConfig {
            entry_window_minutes: minutes,
            entry_window_max_observations: count,
            exit_tolerance_pct: tolerance,
            ..AnalysisConfig::default()
        }
    })
}

fn to_log(series: &[(&str, Vec<(i64, f64, u64)>)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (ticker, points) in series {
        for obs in to_observations(ticker, points) {
            lines.push(format!(
                "{} [INFO]    {}: last={:.2} vol={}",
                obs.timestamp.format("%Y-%m-%d %H:%M:%S,000"),
                obs.ticker,
                obs.price,
                obs.volume
            ));
        }
    }
    lines
}

// ── 1. Peak ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn peak_is_earliest_maximum(series in arb_series()) {
        let observations = to_observations("XYZ", &series);
        let t = build_trajectory("XYZ", observations.clone(), &AnalysisConfig::default()).unwrap();

        let max = observations.iter().map(|o| o.price).fold(f64::MIN, f64::max);
        let earliest = observations.iter().find(|o| o.price == max).unwrap();

        prop_assert_eq!(t.peak_price, max);
        prop_assert_eq!(t.peak_time, earliest.timestamp);
        prop_assert!(t.peak_time >= t.first_seen_time);
        prop_assert!(t.peak_time <= t.last_time);
        prop_assert_eq!(t.insufficient_data, observations.len() < 2);
    }
}

// ── 2. Entry caps ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn entry_window_respects_caps(series in arb_series(), config in arb_config()) {
        let t = build_trajectory("XYZ", to_observations("XYZ", &series), &config).unwrap();
        let entry = entry_window(&t, &config).unwrap();

        prop_assert!(entry.duration() <= config.entry_window_duration());
        prop_assert!(entry.observations <= config.entry_window_max_observations);
        prop_assert!(entry.observations >= 1);
        prop_assert_eq!(entry.start_time, t.first_seen_time);

        // Price range is exactly that of the covered prefix.
        let prefix = &t.observations[..entry.observations];
        let lo = prefix.iter().map(|o| o.price).fold(f64::MAX, f64::min);
        let hi = prefix.iter().map(|o| o.price).fold(f64::MIN, f64::max);
        prop_assert_eq!(entry.min_price, lo);
        prop_assert_eq!(entry.max_price, hi);
    }
}

// ── 3. Exit band ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn exit_window_is_exactly_the_band(series in arb_series(), config in arb_config()) {
        let t = build_trajectory("XYZ", to_observations("XYZ", &series), &config).unwrap();
        let exit = exit_window(&t, &config).unwrap();
        let threshold = exit_threshold(t.peak_price, &config);

        let inside: Vec<_> = t.observations.iter().filter(|o| o.price >= threshold).collect();
        prop_assert_eq!(exit.observations, inside.len());
        prop_assert!(exit.min_price >= threshold);
        prop_assert_eq!(exit.max_price, t.peak_price);
        for o in &inside {
            prop_assert!(o.timestamp >= exit.start_time && o.timestamp <= exit.end_time);
        }
        prop_assert!(exit.start_time <= t.peak_time && t.peak_time <= exit.end_time);
    }
}

// ── 4 & 5. Ranking and idempotence ───────────────────────────────────

proptest! {
    #[test]
    fn ranking_is_ordered_and_runs_are_idempotent(
        a in arb_series(),
        b in arb_series(),
        c in arb_series(),
    ) {
        let log = to_log(&[("AAA", a), ("BBB", b), ("CCC", c)]);
        let analyzer = EodAnalyzer::new(AnalysisConfig::default()).unwrap();

        let first = analyzer.analyze_lines(&log);
        let second = analyzer.analyze_lines(&log);
        prop_assert_eq!(&first, &second);

        for pair in first.opportunities.windows(2) {
            prop_assert!(gain_key(pair[0].gain_pct()) >= gain_key(pair[1].gain_pct()));
        }
        for (i, opp) in first.opportunities.iter().enumerate() {
            prop_assert_eq!(opp.rank, i + 1);
        }
        prop_assert_eq!(
            first.opportunities.len() + first.rejections.len(),
            first.tracked_tickers
        );
    }
}
