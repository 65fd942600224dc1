//! Missed-opportunity CSV, one row per top-N pick, appended per day.

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gaplab_core::{AnalysisReport, CatchableOpportunity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissedRow {
    pub date: NaiveDate,
    pub ticker: String,
    pub open_price: f64,
    pub first_seen_time: String,
    pub first_seen_price: f64,
    pub peak_time: String,
    pub peak_price: f64,
    pub gain_pct: f64,
    pub volume_m: f64,
    pub entry_window: String,
    pub exit_window: String,
    pub notes: String,
}

impl MissedRow {
    pub fn from_opportunity(date: NaiveDate, opp: &CatchableOpportunity) -> Self {
        let t = &opp.trajectory;
        Self {
            date,
            ticker: t.ticker.clone(),
            open_price: round2(t.open_price),
            first_seen_time: t.first_seen_time.format("%H:%M").to_string(),
            first_seen_price: round2(t.first_seen_price),
            peak_time: t.peak_time.format("%H:%M").to_string(),
            peak_price: round2(t.peak_price),
            gain_pct: round2(t.gain_pct),
            volume_m: round2(t.max_volume as f64 / 1_000_000.0),
            entry_window: opp.entry_window.describe(),
            exit_window: opp.exit_window.describe(),
            notes: format!("EOD Analysis - Best pick #{}", opp.rank),
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Append the report's top-N picks to `path`. The header is written only
/// when the file is new or empty. Returns the number of rows written.
pub fn append_missed(path: &Path, date: NaiveDate, report: &AnalysisReport) -> Result<usize> {
    let picks = report.top();
    if picks.is_empty() {
        return Ok(0);
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
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    for opp in picks {
        writer
            .serialize(MissedRow::from_opportunity(date, opp))
            .context("failed to write missed-opportunity row")?;
    }
    writer.flush().context("failed to flush missed CSV")?;

    tracing::debug!(path = %path.display(), rows = picks.len(), "appended missed opportunities");
    Ok(picks.len())
}

/// Read every row back, skipping ones that no longer parse.
pub fn load_missed(path: &Path) -> Result<Vec<MissedRow>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(reader.deserialize().filter_map(|row| row.ok()).collect())
}
