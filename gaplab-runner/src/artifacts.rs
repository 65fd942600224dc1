//! JSON artifact holding the full analysis report.
//!
//! The artifact carries the whole ranked set and every rejection, not just
//! the top-N cut, so later aggregation never has to re-read the scanner log.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gaplab_core::AnalysisReport;

/// Bumped whenever the artifact layout changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

/// On-disk wrapper around an [`AnalysisReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EodArtifact {
    pub schema_version: u32,
    pub date: NaiveDate,
    pub report: AnalysisReport,
}

/// Serialize a report for `date` to pretty JSON.
pub fn export_json(date: NaiveDate, report: &AnalysisReport) -> Result<String> {
    let artifact = EodArtifact {
        schema_version: SCHEMA_VERSION,
        date,
        report: report.clone(),
    };
    serde_json::to_string_pretty(&artifact).context("failed to serialize EOD artifact to JSON")
}

/// Deserialize an artifact, rejecting newer schema versions.
pub fn import_json(json: &str) -> Result<EodArtifact> {
    let artifact: EodArtifact =
        serde_json::from_str(json).context("failed to deserialize EOD artifact from JSON")?;
    if artifact.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            artifact.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(artifact)
}

/// Write `eod_<date>.json` under `output_dir`. Returns the file path.
pub fn save_artifact(output_dir: &Path, date: NaiveDate, report: &AnalysisReport) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir {}", output_dir.display()))?;
    let path = output_dir.join(format!("eod_{date}.json"));
    let json = export_json(date, report)?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write artifact {}", path.display()))?;
    Ok(path)
}
