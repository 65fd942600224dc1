//! Report generators.

mod markdown;

pub use markdown::EodReportGenerator;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use gaplab_core::{AnalysisConfig, AnalysisReport};

/// Render and write `eod_report_<date>.md` under `output_dir`.
pub fn write_eod_report(
    output_dir: &Path,
    date: NaiveDate,
    config: &AnalysisConfig,
    report: &AnalysisReport,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create report dir {}", output_dir.display()))?;
    let path = output_dir.join(format!("eod_report_{date}.md"));
    let markdown = EodReportGenerator.generate(date, config, report);
    std::fs::write(&path, markdown)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(path)
}
