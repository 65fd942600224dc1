//! Weekly P/L summary over the trade journal.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::journal::JournalEntry;

/// Monday..=Sunday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSummary {
    pub date: NaiveDate,
    pub ticker: String,
    pub pl_dollar: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickerStats {
    pub trades: usize,
    pub total_pl: f64,
    pub wins: usize,
}

/// Aggregates over closed trades. Open positions are counted separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub open: usize,
    pub win_rate: f64,
    pub total_pl: f64,
    pub avg_pl: f64,
    pub avg_pl_percent: f64,
    pub best: Option<TradeSummary>,
    pub worst: Option<TradeSummary>,
    pub by_ticker: BTreeMap<String, TickerStats>,
}

impl WeeklySummary {
    pub fn from_entries(start: NaiveDate, end: NaiveDate, entries: &[JournalEntry]) -> Self {
        let closed: Vec<(&JournalEntry, f64)> = entries
            .iter()
            .filter_map(|e| e.pl_dollar.map(|pl| (e, pl)))
            .collect();
        let count = closed.len();
        let wins = closed.iter().filter(|(_, pl)| *pl > 0.0).count();
        let losses = closed.iter().filter(|(_, pl)| *pl < 0.0).count();
        let total_pl: f64 = closed.iter().map(|(_, pl)| pl).sum();
        let pl_percent_sum: f64 = closed.iter().filter_map(|(e, _)| e.pl_percent).sum();

        let summarize = |(e, pl): &(&JournalEntry, f64)| TradeSummary {
            date: e.date,
            ticker: e.ticker.clone(),
            pl_dollar: *pl,
        };
        let best = closed.iter().max_by(|a, b| a.1.total_cmp(&b.1)).map(summarize);
        let worst = closed.iter().min_by(|a, b| a.1.total_cmp(&b.1)).map(summarize);

        let mut by_ticker: BTreeMap<String, TickerStats> = BTreeMap::new();
        for (e, pl) in &closed {
            let stats = by_ticker.entry(e.ticker.clone()).or_default();
            stats.trades += 1;
            stats.total_pl += pl;
            if *pl > 0.0 {
                stats.wins += 1;
            }
        }

        let per_trade = |x: f64| if count > 0 { round2(x / count as f64) } else { 0.0 };
        Self {
            start,
            end,
            count,
            wins,
            losses,
            breakeven: count - wins - losses,
            open: entries.len() - count,
            win_rate: if count > 0 {
                round2(wins as f64 / count as f64 * 100.0)
            } else {
                0.0
            },
            total_pl: round2(total_pl),
            avg_pl: per_trade(total_pl),
            avg_pl_percent: per_trade(pl_percent_sum),
            best,
            worst,
            by_ticker,
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "# Weekly Summary — {} → {}\n\n\
- Trades: **{}**  |  Wins: **{}**  |  Losses: **{}**  |  Breakeven: **{}**\n\
- Win rate: **{:.2}%**\n\
- Total P/L: **${:.2}**  |  Avg P/L: **${:.2}**  |  Avg P/L %: **{:.2}%**\n",
            self.start,
            self.end,
            self.count,
            self.wins,
            self.losses,
            self.breakeven,
            self.win_rate,
            self.total_pl,
            self.avg_pl,
            self.avg_pl_percent,
        );
        if self.open > 0 {
            out.push_str(&format!("- Open positions: **{}**\n", self.open));
        }
        if let Some(best) = &self.best {
            out.push_str(&format!("- Best: **{}** ${:.2} ({})\n", best.ticker, best.pl_dollar, best.date));
        }
        if let Some(worst) = &self.worst {
            out.push_str(&format!("- Worst: **{}** ${:.2} ({})\n", worst.ticker, worst.pl_dollar, worst.date));
        }

        if !self.by_ticker.is_empty() {
            out.push_str("\n## By Ticker\n\n");
            out.push_str("| Ticker | Trades | Wins | P/L |\n");
            out.push_str("|--------|--------|------|-----|\n");
            for (ticker, stats) in &self.by_ticker {
                out.push_str(&format!(
                    "| {} | {} | {} | ${:.2} |\n",
                    ticker, stats.trades, stats.wins, stats.total_pl
                ));
            }
        }
        out
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Write `weekly_<start>_<end>.md` under `output_dir`.
pub fn write_weekly_markdown(output_dir: &Path, summary: &WeeklySummary) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let path = output_dir.join(format!("weekly_{}_{}.md", summary.start, summary.end));
    std::fs::write(&path, summary.to_markdown())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
