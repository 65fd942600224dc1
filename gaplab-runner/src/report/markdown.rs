//! Markdown EOD report generator.

use chrono::NaiveDate;

use gaplab_core::{AnalysisConfig, AnalysisReport, CatchableOpportunity, DataStatus};

pub struct EodReportGenerator;

impl EodReportGenerator {
    pub fn generate(
        &self,
        date: NaiveDate,
        config: &AnalysisConfig,
        report: &AnalysisReport,
    ) -> String {
        let mut out = format!(
            "# EOD Analysis — {}\n\n\
Config: `{}`\n\n\
## Thresholds\n\
- Minimum gain: {:.1}%\n\
- Liquidity floor: {:.1}M shares\n\
- Late-day cutoff: {}\n\
- Reaction time: {} min\n\
- Entry window: {} min / {} scans\n\
- Exit tolerance: {:.1}% below peak\n\
- Open reference: {:?}\n",
            date.format("%A %Y-%m-%d"),
            report.config_hash,
            config.min_gain_pct,
            config.liquidity_floor as f64 / 1_000_000.0,
            config.late_day_cutoff.format("%H:%M"),
            config.min_reaction_minutes,
            config.entry_window_minutes,
            config.entry_window_max_observations,
            config.exit_tolerance_pct,
            config.open_reference,
        );

        out.push_str(&format!("\n## Top {} Catchable Opportunities\n\n", report.top_n));
        match report.status {
            DataStatus::NoData => {
                out.push_str("No scanner data for this date.\n");
            }
            DataStatus::Ok if report.opportunities.is_empty() => {
                out.push_str(&format!(
                    "No catchable opportunities found (minimum gain {:.1}%).\n",
                    config.min_gain_pct
                ));
            }
            DataStatus::Ok => {
                for opp in report.top() {
                    push_opportunity(&mut out, opp);
                }
                if report.opportunities.len() > report.top_n {
                    out.push_str(&format!(
                        "_{} more catchable tickers below the top {}._\n",
                        report.opportunities.len() - report.top_n,
                        report.top_n
                    ));
                }
            }
        }

        push_diagnostics(&mut out, report);
        out
    }
}

fn push_opportunity(out: &mut String, opp: &CatchableOpportunity) {
    let t = &opp.trajectory;
    out.push_str(&format!("### {}. {} (+{:.1}%)\n", opp.rank, t.ticker, t.gain_pct));
    out.push_str(&format!("- Open: ${:.2} ({:?})\n", t.open_price, t.open_source));
    out.push_str(&format!(
        "- First seen: {} @ ${:.2}\n",
        t.first_seen_time.format("%H:%M"),
        t.first_seen_price
    ));
    out.push_str(&format!(
        "- Peak: {} @ ${:.2} ({} min after first seen)\n",
        t.peak_time.format("%H:%M"),
        t.peak_price,
        t.time_to_peak().num_minutes()
    ));
    out.push_str(&format!("- Volume: {:.1}M\n", t.max_volume as f64 / 1_000_000.0));
    out.push_str(&format!("- Entry window: {}\n", opp.entry_window.describe()));
    out.push_str(&format!("- Exit window: {}\n", opp.exit_window.describe()));
    if opp.windows_overlap() {
        out.push_str("- Note: entry and exit windows overlap\n");
    }
    out.push('\n');
}

fn push_diagnostics(out: &mut String, report: &AnalysisReport) {
    out.push_str("\n## Diagnostics\n\n");
    out.push_str(&format!(
        "- Tickers tracked: {}\n- Catchable: {}\n- Rejected: {}\n",
        report.tracked_tickers,
        report.opportunities.len(),
        report.rejections.len()
    ));

    let counts = report.rejection_counts();
    if !counts.is_empty() {
        out.push_str("\n| Reason | Count |\n");
        out.push_str("|--------|-------|\n");
        for (reason, count) in &counts {
            out.push_str(&format!("| {reason} | {count} |\n"));
        }
    }

    let stats = &report.parse_stats;
    out.push_str(&format!(
        "\nParsed {} lines: {} observations, {} noise, {} malformed.\n",
        stats.lines, stats.observations, stats.noise, stats.malformed
    ));
    for line in report.malformed.iter().take(10) {
        out.push_str(&format!("- line {}: {}\n", line.line_no, line.error));
    }
    if report.malformed.len() > 10 {
        out.push_str(&format!("- … {} more\n", report.malformed.len() - 10));
    }
}
