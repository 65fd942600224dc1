//! Groups observations by ticker and summarizes each path.
//!
//! One stable sort per ticker plus one linear scan. Tickers with a single
//! observation are kept and flagged so the catchability filter can report
//! them, rather than disappearing here.

use std::collections::BTreeMap;

use crate::config::{AnalysisConfig, OpenReference};
use crate::domain::{Observation, OpenSource, Trajectory};
use crate::gap::gap_pct;

/// Minimum observations for a trajectory to be considered at all.
pub const MIN_OBSERVATIONS: usize = 2;

/// Build one trajectory per ticker, in ticker order.
pub fn build_trajectories(observations: &[Observation], config: &AnalysisConfig) -> Vec<Trajectory> {
    let mut groups: BTreeMap<&str, Vec<Observation>> = BTreeMap::new();
    for obs in observations {
        groups.entry(obs.ticker.as_str()).or_default().push(obs.clone());
    }

    groups
        .into_iter()
        .filter_map(|(ticker, mut group)| {
            // Stable: equal timestamps keep log order.
            group.sort_by_key(|o| o.timestamp);
            build_trajectory(ticker, group, config)
        })
        .collect()
}

/// Summarize one ticker's observations, which must already be time-ordered.
///
/// Returns `None` for an empty group.
pub fn build_trajectory(
    ticker: &str,
    observations: Vec<Observation>,
    config: &AnalysisConfig,
) -> Option<Trajectory> {
    let first = observations.first()?;
    let mut peak = first;
    let mut max_volume = first.volume;

    for obs in &observations[1..] {
        // Strict comparison keeps the earliest observation on ties.
        if obs.price > peak.price {
            peak = obs;
        }
        max_volume = max_volume.max(obs.volume);
    }
    let last = observations.last()?;

    let (open_price, open_source) = resolve_open(ticker, &observations, config);

    Some(Trajectory {
        ticker: ticker.to_string(),
        open_price,
        open_source,
        first_seen_time: first.timestamp,
        first_seen_price: first.price,
        peak_time: peak.timestamp,
        peak_price: peak.price,
        last_time: last.timestamp,
        last_price: last.price,
        max_volume,
        gain_pct: gap_pct(open_price, peak.price),
        insufficient_data: observations.len() < MIN_OBSERVATIONS,
        observations,
    })
}

fn resolve_open(
    ticker: &str,
    observations: &[Observation],
    config: &AnalysisConfig,
) -> (f64, OpenSource) {
    if let Some(&price) = config.open_references.get(ticker) {
        return (price, OpenSource::External);
    }

    let logged = match config.open_reference {
        OpenReference::FirstSeen => None,
        OpenReference::LoggedOpen => observations
            .iter()
            .find_map(|o| o.open)
            .map(|p| (p, OpenSource::LoggedOpen)),
        OpenReference::PriorClose => observations
            .iter()
            .find_map(|o| o.prev_close)
            .map(|p| (p, OpenSource::PriorClose)),
    };

    logged.unwrap_or((observations[0].price, OpenSource::FirstSeen))
}
