//! Orders catchable opportunities by gain.
//!
//! Order: `gain_pct` descending, then earlier `first_seen_time`, then ticker.
//! Gains are compared at micro-percent resolution, so 10.00 → 11.20 and
//! 25.00 → 28.00 tie at 12%. The full ranked list is always kept; the top-N
//! cut is a view over it.

use std::cmp::Ordering;

use crate::domain::CatchableOpportunity;

/// Sort and assign 1-based ranks.
pub fn rank(mut opportunities: Vec<CatchableOpportunity>) -> Vec<CatchableOpportunity> {
    opportunities.sort_by(compare);
    for (i, opp) in opportunities.iter_mut().enumerate() {
        opp.rank = i + 1;
    }
    opportunities
}

/// The first `n` entries of an already ranked list.
pub fn top_n(ranked: &[CatchableOpportunity], n: usize) -> &[CatchableOpportunity] {
    &ranked[..n.min(ranked.len())]
}

/// Gain quantized to 1e-6 percentage points.
pub fn gain_key(gain_pct: f64) -> i64 {
    (gain_pct * 1e6).round() as i64
}

fn compare(a: &CatchableOpportunity, b: &CatchableOpportunity) -> Ordering {
    gain_key(b.trajectory.gain_pct)
        .cmp(&gain_key(a.trajectory.gain_pct))
        .then_with(|| a.trajectory.first_seen_time.cmp(&b.trajectory.first_seen_time))
        .then_with(|| a.trajectory.ticker.cmp(&b.trajectory.ticker))
}
