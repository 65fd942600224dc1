//! EOD analyzer entry point.
//!
//! A pure function of (log contents, configuration): parse → build
//! trajectories → filter → windows → rank. Nothing is kept between runs, so
//! analyzing the same log twice with the same config gives the same report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catchability::CatchabilityFilter;
use crate::config::{AnalysisConfig, ConfigError};
use crate::domain::{CatchableOpportunity, Rejection, RejectionReason};
use crate::parser::{parse_lines, MalformedLine, ParseStats, ParsedLog};
use crate::ranker::{rank, top_n};
use crate::trajectory_builder::build_trajectories;
use crate::windows::{entry_window, exit_window};

/// Errors that stop an analysis run.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Whether the log held anything to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataStatus {
    Ok,
    /// Missing or empty log, or no parseable observations. A quiet day.
    NoData,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub status: DataStatus,
    pub config_hash: String,
    pub top_n: usize,
    pub parse_stats: ParseStats,
    pub malformed: Vec<MalformedLine>,
    pub tracked_tickers: usize,
    /// Full ranked catchable set.
    pub opportunities: Vec<CatchableOpportunity>,
    /// Non-catchable trajectories with the rule that rejected each.
    pub rejections: Vec<Rejection>,
}

impl AnalysisReport {
    fn no_data(config: &AnalysisConfig, parsed: ParsedLog) -> Self {
        Self {
            status: DataStatus::NoData,
            config_hash: config.config_hash(),
            top_n: config.top_n,
            parse_stats: parsed.stats,
            malformed: parsed.malformed,
            tracked_tickers: 0,
            opportunities: Vec::new(),
            rejections: Vec::new(),
        }
    }

    /// The primary report cut: the first `top_n` ranked opportunities.
    pub fn top(&self) -> &[CatchableOpportunity] {
        top_n(&self.opportunities, self.top_n)
    }

    pub fn opportunity(&self, ticker: &str) -> Option<&CatchableOpportunity> {
        self.opportunities.iter().find(|o| o.ticker() == ticker)
    }

    pub fn rejection(&self, ticker: &str) -> Option<&Rejection> {
        self.rejections.iter().find(|r| r.ticker == ticker)
    }

    /// Rejections per reason, in rule order.
    pub fn rejection_counts(&self) -> BTreeMap<RejectionReason, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.rejections {
            *counts.entry(r.reason).or_insert(0) += 1;
        }
        counts
    }
}

/// Stateless analyzer bound to one validated configuration.
#[derive(Debug, Clone)]
pub struct EodAnalyzer {
    config: AnalysisConfig,
}

impl EodAnalyzer {
    /// Validates the configuration up front so a bad threshold never
    /// surfaces halfway through a run.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalyzeError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a log file. A missing file is a no-data day, not an error.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; the affected lines end
    /// up counted as malformed.
    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisReport, AnalyzeError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "scanner log not found, treating as no data");
                return Ok(AnalysisReport::no_data(&self.config, ParsedLog::default()));
            }
            Err(source) => {
                return Err(AnalyzeError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.analyze_lines(text.lines()))
    }

    /// Analyze raw log lines.
    pub fn analyze_lines<I, S>(&self, lines: I) -> AnalysisReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.analyze_parsed(parse_lines(lines))
    }

    /// Analyze an already parsed log.
    pub fn analyze_parsed(&self, parsed: ParsedLog) -> AnalysisReport {
        if parsed.observations.is_empty() {
            tracing::warn!(
                lines = parsed.stats.lines,
                malformed = parsed.stats.malformed,
                "no observations in scanner log"
            );
            return AnalysisReport::no_data(&self.config, parsed);
        }

        let trajectories = build_trajectories(&parsed.observations, &self.config);
        let tracked_tickers = trajectories.len();
        let filter = CatchabilityFilter::new(&self.config);

        let mut candidates = Vec::new();
        let mut rejections = Vec::new();
        for trajectory in trajectories {
            if let Err(reason) = filter.check(&trajectory) {
                rejections.push(Rejection::new(&trajectory, reason));
                continue;
            }
            match (
                entry_window(&trajectory, &self.config),
                exit_window(&trajectory, &self.config),
            ) {
                (Some(entry_window), Some(exit_window)) => candidates.push(CatchableOpportunity {
                    rank: 0,
                    trajectory,
                    entry_window,
                    exit_window,
                }),
                _ => rejections.push(Rejection::new(
                    &trajectory,
                    RejectionReason::InsufficientData,
                )),
            }
        }

        let opportunities = rank(candidates);
        tracing::info!(
            tickers = tracked_tickers,
            catchable = opportunities.len(),
            rejected = rejections.len(),
            malformed = parsed.stats.malformed,
            "analysis complete"
        );

        AnalysisReport {
            status: DataStatus::Ok,
            config_hash: self.config.config_hash(),
            top_n: self.config.top_n,
            parse_stats: parsed.stats,
            malformed: parsed.malformed,
            tracked_tickers,
            opportunities,
            rejections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
2025-10-08 09:30:01,000 [INFO] Top 5 movers by gap %:
2025-10-08 09:35:00,000 [INFO]    XYZ: score=90.0 chg=+5.0% last=2.00 vol=2.0M
2025-10-08 09:35:00,000 [INFO]    THIN: score=50.0 chg=+2.0% last=5.00 vol=400K
2025-10-08 09:40:00,000 [INFO]    XYZ: score=95.0 chg=+15.0% last=2.20 vol=2.0M
2025-10-08 09:40:00,000 [INFO]    THIN: score=60.0 chg=+20.0% last=6.00 vol=500K
2025-10-08 09:45:00,000 [INFO]    SOLO: score=10.0 chg=+1.0% last=3.00 vol=9.0M
not a log line
2025-10-08 09:50:00,000 [INFO]    XYZ: score=99.0 chg=+25.0% last=2.50 vol=2.0M
";

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = AnalysisConfig {
            top_n: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            EodAnalyzer::new(config),
            Err(AnalyzeError::Config(_))
        ));
    }

    #[test]
    fn small_log_end_to_end() {
        let analyzer = EodAnalyzer::new(AnalysisConfig::default()).unwrap();
        let report = analyzer.analyze_lines(LOG.lines());

        assert_eq!(report.status, DataStatus::Ok);
        assert_eq!(report.tracked_tickers, 3);
        assert_eq!(report.parse_stats.malformed, 1);
        assert_eq!(report.opportunities.len(), 1);
        assert_eq!(report.opportunities[0].ticker(), "XYZ");
        assert_eq!(report.opportunities[0].rank, 1);

        assert_eq!(report.rejection("THIN").unwrap().reason, RejectionReason::Illiquid);
        assert_eq!(
            report.rejection("SOLO").unwrap().reason,
            RejectionReason::InsufficientData
        );
        let counts = report.rejection_counts();
        assert_eq!(counts.get(&RejectionReason::Illiquid), Some(&1));
        assert_eq!(counts.get(&RejectionReason::LateDay), None);
    }

    #[test]
    fn empty_log_is_no_data() {
        let analyzer = EodAnalyzer::new(AnalysisConfig::default()).unwrap();
        let report = analyzer.analyze_lines(Vec::<String>::new());
        assert_eq!(report.status, DataStatus::NoData);
        assert!(report.opportunities.is_empty());
        assert!(report.top().is_empty());
    }

    #[test]
    fn missing_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = EodAnalyzer::new(AnalysisConfig::default()).unwrap();
        let report = analyzer
            .analyze_file(&dir.path().join("scanner_2025-10-08.log"))
            .unwrap();
        assert_eq!(report.status, DataStatus::NoData);
    }

    #[test]
    fn file_with_invalid_utf8_still_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanner.log");
        let mut bytes = LOG.as_bytes().to_vec();
        bytes.extend_from_slice(b"\xff\xfe broken tail\n");
        std::fs::write(&path, bytes).unwrap();

        let analyzer = EodAnalyzer::new(AnalysisConfig::default()).unwrap();
        let report = analyzer.analyze_file(&path).unwrap();
        assert_eq!(report.opportunities.len(), 1);
        assert_eq!(report.parse_stats.malformed, 2);
    }

    #[test]
    fn directory_path_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = EodAnalyzer::new(AnalysisConfig::default()).unwrap();
        assert!(matches!(
            analyzer.analyze_file(dir.path()),
            Err(AnalyzeError::Read { .. })
        ));
    }
}
