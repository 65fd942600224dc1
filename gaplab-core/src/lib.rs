//! GapLab Core — end-of-day opportunity analysis over scanner logs.
//!
//! Pipeline, leaf first:
//! - Snapshot parser: log lines → typed observations (malformed lines counted)
//! - Trajectory builder: observations grouped per ticker, first/peak/last
//! - Catchability filter: timing, liquidity, reaction-time and gain rules
//! - Window calculator: entry and exit time/price windows
//! - Ranker: gain-ordered opportunity list with a top-N view
//!
//! [`EodAnalyzer`] runs the whole pipeline for one validated [`AnalysisConfig`].
//! File formats for reports live in `gaplab-runner`.

pub mod analyzer;
pub mod catchability;
pub mod config;
pub mod domain;
pub mod gap;
pub mod history;
pub mod parser;
pub mod ranker;
pub mod trajectory_builder;
pub mod windows;

pub use analyzer::{AnalysisReport, AnalyzeError, DataStatus, EodAnalyzer};
pub use config::{AnalysisConfig, ConfigError, OpenReference};
pub use domain::{
    CatchableOpportunity, Observation, OpenSource, PriceWindow, Rejection, RejectionReason,
    Trajectory,
};
pub use history::{Performer, ScanHistory};
pub use parser::{parse_line, parse_lines, LineKind, MalformedLine, ParseError, ParseStats, ParsedLog};
