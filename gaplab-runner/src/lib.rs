//! GapLab Runner — reporting collaborators around the EOD analyzer.
//!
//! This crate builds on `gaplab-core` to provide:
//! - Markdown EOD report and JSON artifact
//! - Missed-opportunity CSV
//! - Trade journal with P/L and comparison against the day's picks
//! - Weekly summary

pub mod artifacts;
pub mod compare;
pub mod journal;
pub mod missed;
pub mod report;
pub mod weekly;

pub use artifacts::{export_json, import_json, save_artifact, EodArtifact};
pub use compare::{compare_with_journal, Hit, JournalComparison};
pub use journal::{
    compute_pl, load_for_date, load_range, record_trade, JournalEntry, ProfitLoss, Side,
};
pub use missed::{append_missed, load_missed, MissedRow};
pub use report::{write_eod_report, EodReportGenerator};
pub use weekly::{week_bounds, write_weekly_markdown, WeeklySummary};
