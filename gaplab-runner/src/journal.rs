//! Trade journal: a CSV of executed trades, one row per trade.
//!
//! Rows are appended, never rewritten. Rows that no longer parse are skipped
//! on load.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gaplab_core::gap::gap_pct;

/// Column order of the journal file.
pub const JOURNAL_HEADERS: [&str; 12] = [
    "date",
    "ticker",
    "side",
    "entry_price",
    "exit_price",
    "shares",
    "total_cost",
    "pl_dollar",
    "pl_percent",
    "plan",
    "actual",
    "notes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => f.write_str("long"),
            Side::Short => f.write_str("short"),
        }
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Side::Long),
            "short" | "sell" => Ok(Side::Short),
            other => bail!("unknown side '{other}' (expected long or short)"),
        }
    }
}

/// Realized P/L of a closed trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitLoss {
    pub total_cost: f64,
    pub pl_dollar: f64,
    pub pl_percent: f64,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Cost basis and long-side P/L, rounded to cents and 2-decimal percent.
pub fn compute_pl(entry_price: f64, exit_price: f64, shares: u32) -> ProfitLoss {
    let shares = f64::from(shares);
    ProfitLoss {
        total_cost: round2(entry_price * shares),
        pl_dollar: round2((exit_price - entry_price) * shares),
        pl_percent: round2(gap_pct(entry_price, exit_price)),
    }
}

/// One journal row. `exit_price` is empty while the position is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub ticker: String,
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub shares: u32,
    pub total_cost: f64,
    pub pl_dollar: Option<f64>,
    pub pl_percent: Option<f64>,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub actual: String,
    #[serde(default)]
    pub notes: String,
}

impl JournalEntry {
    /// Build a row, computing cost and P/L. Shorts profit when the price falls.
    pub fn new(
        date: NaiveDate,
        ticker: &str,
        side: Side,
        entry_price: f64,
        exit_price: Option<f64>,
        shares: u32,
    ) -> Self {
        let total_cost = round2(entry_price * f64::from(shares));
        let (pl_dollar, pl_percent) = match exit_price {
            Some(exit) => {
                let pl = compute_pl(entry_price, exit, shares);
                match side {
                    Side::Long => (Some(pl.pl_dollar), Some(pl.pl_percent)),
                    Side::Short => (Some(-pl.pl_dollar), Some(-pl.pl_percent)),
                }
            }
            None => (None, None),
        };
        Self {
            date,
            ticker: ticker.trim().to_ascii_uppercase(),
            side,
            entry_price,
            exit_price,
            shares,
            total_cost,
            pl_dollar,
            pl_percent,
            plan: String::new(),
            actual: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, plan: &str, actual: &str, notes: &str) -> Self {
        self.plan = plan.to_string();
        self.actual = actual.to_string();
        self.notes = notes.to_string();
        self
    }

    pub fn is_open(&self) -> bool {
        self.exit_price.is_none()
    }
}

/// Append a trade to the journal, creating the file (with header) if needed.
pub fn record_trade(path: &Path, entry: &JournalEntry) -> Result<()> {
    if entry.entry_price <= 0.0 || !entry.entry_price.is_finite() {
        bail!("entry price must be positive, got {}", entry.entry_price);
    }
    if entry.shares == 0 {
        bail!("shares must be positive");
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open journal {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    writer
        .serialize(entry)
        .context("failed to write journal row")?;
    writer.flush().context("failed to flush journal")?;

    tracing::info!(
        ticker = %entry.ticker,
        side = %entry.side,
        pl_dollar = ?entry.pl_dollar,
        "trade recorded"
    );
    Ok(())
}

/// Trades dated within `start..=end`. A missing journal is an empty one.
pub fn load_range(path: &Path, start: NaiveDate, end: NaiveDate) -> Result<Vec<JournalEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open journal {}", path.display()))?;

    let mut entries = Vec::new();
    for (i, row) in reader.deserialize::<JournalEntry>().enumerate() {
        match row {
            Ok(mut entry) if entry.date >= start && entry.date <= end => {
                entry.ticker = entry.ticker.trim().to_ascii_uppercase();
                entries.push(entry);
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(row = i + 2, error = %e, "skipping unreadable journal row"),
        }
    }
    Ok(entries)
}

/// Trades for a single day.
pub fn load_for_date(path: &Path, date: NaiveDate) -> Result<Vec<JournalEntry>> {
    load_range(path, date, date)
}
