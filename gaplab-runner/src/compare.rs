//! Journal vs. EOD picks.

use std::collections::BTreeSet;

use serde::Serialize;

use gaplab_core::AnalysisReport;

use crate::journal::JournalEntry;

/// A trade on a ticker that made the top-N.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub ticker: String,
    pub rank: usize,
    pub max_gain_pct: f64,
    pub pl_percent: Option<f64>,
    /// Share of the available move captured, in percent.
    pub efficiency_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JournalComparison {
    pub hits: Vec<Hit>,
    /// Tickers traded that were not among the top-N picks.
    pub outside_top: Vec<String>,
    /// Tickers with an entry but no exit yet.
    pub open_positions: Vec<String>,
    /// Top-N picks that were not traded.
    pub missed: Vec<String>,
}

impl JournalComparison {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
            && self.outside_top.is_empty()
            && self.open_positions.is_empty()
            && self.missed.is_empty()
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::from("## Journal Comparison\n\n");
        if self.hits.is_empty() {
            out.push_str("No trades on top picks.\n");
        }
        for hit in &self.hits {
            match (hit.pl_percent, hit.efficiency_pct) {
                (Some(pl), Some(eff)) => out.push_str(&format!(
                    "- HIT #{} {}: {:+.2}% of a {:.1}% move ({:.0}% captured)\n",
                    hit.rank, hit.ticker, pl, hit.max_gain_pct, eff
                )),
                _ => out.push_str(&format!(
                    "- HIT #{} {}: still open ({:.1}% move available)\n",
                    hit.rank, hit.ticker, hit.max_gain_pct
                )),
            }
        }
        if !self.outside_top.is_empty() {
            out.push_str(&format!("- Outside top picks: {}\n", self.outside_top.join(", ")));
        }
        if !self.open_positions.is_empty() {
            out.push_str(&format!("- Open positions: {}\n", self.open_positions.join(", ")));
        }
        if !self.missed.is_empty() {
            out.push_str(&format!("- Missed: {}\n", self.missed.join(", ")));
        }
        out
    }
}

/// Compare one day's trades against the report's top-N. Tickers match
/// case-insensitively.
pub fn compare_with_journal(report: &AnalysisReport, trades: &[JournalEntry]) -> JournalComparison {
    let top = report.top();
    let traded: BTreeSet<String> = trades
        .iter()
        .map(|t| t.ticker.trim().to_ascii_uppercase())
        .collect();

    let mut comparison = JournalComparison::default();
    for trade in trades {
        let ticker = trade.ticker.trim().to_ascii_uppercase();
        if trade.is_open() && !comparison.open_positions.contains(&ticker) {
            comparison.open_positions.push(ticker.clone());
        }
        match top.iter().find(|o| o.ticker() == ticker) {
            Some(opp) => {
                let max_gain = opp.gain_pct();
                let efficiency = trade
                    .pl_percent
                    .filter(|_| max_gain > 0.0)
                    .map(|pl| pl / max_gain * 100.0);
                comparison.hits.push(Hit {
                    ticker,
                    rank: opp.rank,
                    max_gain_pct: max_gain,
                    pl_percent: trade.pl_percent,
                    efficiency_pct: efficiency,
                });
            }
            None if !comparison.outside_top.contains(&ticker) => {
                comparison.outside_top.push(ticker);
            }
            None => {}
        }
    }
    comparison.missed = top
        .iter()
        .filter(|o| !traded.contains(o.ticker()))
        .map(|o| o.ticker().to_string())
        .collect();
    comparison
}
