//! GapLab CLI — end-of-day analysis, scan drill-down and trade journal commands.
//!
//! Commands:
//! - `eod` — analyze a day's scanner log, write report/CSV/JSON, compare with the journal
//! - `ticker` — one ticker's timeline from a scanner log
//! - `summary` — appearance counts and best performers from a scanner log
//! - `log-trade` — append a trade to the journal
//! - `week` — weekly P/L summary from the journal

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use gaplab_core::{parse_lines, AnalysisConfig, DataStatus, EodAnalyzer, ParsedLog, ScanHistory};
use gaplab_runner::{
    append_missed, compare_with_journal, load_for_date, load_range, record_trade, save_artifact,
    week_bounds, write_eod_report, write_weekly_markdown, JournalEntry, Side, WeeklySummary,
};

#[derive(Parser)]
#[command(
    name = "gaplab",
    about = "GapLab CLI — premarket/intraday gap scanner analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a day's scanner log and write the EOD report.
    Eod {
        /// Trading date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Directory holding scanner_<date>.log files.
        #[arg(long, default_value = "logs")]
        log_dir: PathBuf,

        /// Output directory for report, JSON and missed CSV.
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,

        /// TOML file with analysis thresholds.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the minimum gain percent.
        #[arg(long)]
        min_gain: Option<f64>,

        /// Override how many picks the report shows.
        #[arg(long)]
        top_n: Option<usize>,

        /// Skip appending to the missed-opportunity CSV.
        #[arg(long, default_value_t = false)]
        no_csv: bool,

        /// Trade journal to compare against.
        #[arg(long, default_value = "journal/trades.csv")]
        journal: PathBuf,
    },
    /// Show one ticker's timeline from a scanner log.
    Ticker {
        /// Scanner log file.
        log: PathBuf,

        /// Ticker symbol.
        ticker: String,
    },
    /// Summarize a scanner log: most frequent tickers and best performers.
    Summary {
        /// Scanner log file.
        log: PathBuf,

        /// Minimum first-seen to peak gain for the performers list.
        #[arg(long, default_value_t = 5.0)]
        min_gain: f64,

        /// How many tickers to list.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Append a trade to the journal.
    LogTrade {
        /// Ticker symbol.
        ticker: String,

        /// Entry price.
        entry: f64,

        /// Exit price. Omit for an open position.
        exit: Option<f64>,

        /// Share count.
        #[arg(long)]
        shares: u32,

        /// long or short.
        #[arg(long, default_value = "long")]
        side: String,

        /// Trade date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value = "")]
        plan: String,

        #[arg(long, default_value = "")]
        actual: String,

        #[arg(long, default_value = "")]
        notes: String,

        /// Journal CSV path.
        #[arg(long, default_value = "journal/trades.csv")]
        journal: PathBuf,
    },
    /// Weekly P/L summary from the journal.
    Week {
        /// Journal CSV path.
        #[arg(long, default_value = "journal/trades.csv")]
        journal: PathBuf,

        /// Week start (YYYY-MM-DD). Defaults to six days before --end, or this week's Monday.
        #[arg(long)]
        start: Option<String>,

        /// Week end (YYYY-MM-DD). Defaults to six days after --start, or this week's Sunday.
        #[arg(long)]
        end: Option<String>,

        /// Output directory for the Markdown summary.
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Eod {
            date,
            log_dir,
            output_dir,
            config,
            min_gain,
            top_n,
            no_csv,
            journal,
        } => run_eod(EodArgs {
            date,
            log_dir,
            output_dir,
            config,
            min_gain,
            top_n,
            no_csv,
            journal,
        }),
        Commands::Ticker { log, ticker } => run_ticker(&log, &ticker),
        Commands::Summary {
            log,
            min_gain,
            limit,
        } => run_summary(&log, min_gain, limit),
        Commands::LogTrade {
            ticker,
            entry,
            exit,
            shares,
            side,
            date,
            plan,
            actual,
            notes,
            journal,
        } => {
            let date = parse_date(date.as_deref())?;
            let side: Side = side.parse()?;
            let trade = JournalEntry::new(date, &ticker, side, entry, exit, shares)
                .with_notes(&plan, &actual, &notes);
            record_trade(&journal, &trade)?;
            match trade.pl_dollar {
                Some(pl) => println!(
                    "Logged {} {} x{} @ ${:.2} → ${:.2}: ${:+.2} ({:+.2}%)",
                    trade.side,
                    trade.ticker,
                    trade.shares,
                    trade.entry_price,
                    exit.unwrap_or_default(),
                    pl,
                    trade.pl_percent.unwrap_or_default()
                ),
                None => println!(
                    "Logged open {} {} x{} @ ${:.2}",
                    trade.side, trade.ticker, trade.shares, trade.entry_price
                ),
            }
            Ok(())
        }
        Commands::Week {
            journal,
            start,
            end,
            output_dir,
        } => run_week(&journal, start.as_deref(), end.as_deref(), &output_dir),
    }
}

/// `RUST_LOG` controls the filter; `GAPLAB_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("GAPLAB_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    raw.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("dates must be YYYY-MM-DD")
        .map(|d| d.unwrap_or_else(|| chrono::Local::now().date_naive()))
}

struct EodArgs {
    date: Option<String>,
    log_dir: PathBuf,
    output_dir: PathBuf,
    config: Option<PathBuf>,
    min_gain: Option<f64>,
    top_n: Option<usize>,
    no_csv: bool,
    journal: PathBuf,
}

fn run_eod(args: EodArgs) -> Result<()> {
    let date = parse_date(args.date.as_deref())?;

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(min_gain) = args.min_gain {
        config.min_gain_pct = min_gain;
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    let analyzer = EodAnalyzer::new(config)?;

    let log_path = args.log_dir.join(format!("scanner_{date}.log"));
    tracing::info!(path = %log_path.display(), %date, "analyzing scanner log");
    let report = analyzer.analyze_file(&log_path)?;

    let report_path = write_eod_report(&args.output_dir, date, analyzer.config(), &report)?;
    let json_path = save_artifact(&args.output_dir, date, &report)?;

    println!("EOD {date}: {} tickers tracked", report.tracked_tickers);
    if report.status == DataStatus::NoData {
        println!("No scanner data in {}", log_path.display());
    } else if report.opportunities.is_empty() {
        println!(
            "No catchable opportunities (minimum gain {:.1}%)",
            analyzer.config().min_gain_pct
        );
    }
    for opp in report.top() {
        println!(
            "  #{} {:<6} +{:>5.1}%  entry {}  exit {}",
            opp.rank,
            opp.ticker(),
            opp.gain_pct(),
            opp.entry_window.describe(),
            opp.exit_window.describe()
        );
    }

    if !args.no_csv {
        let missed_path = args.output_dir.join("missed.csv");
        let rows = append_missed(&missed_path, date, &report)?;
        if rows > 0 {
            println!("Appended {rows} rows to {}", missed_path.display());
        }
    }

    let trades = load_for_date(&args.journal, date)?;
    if !trades.is_empty() {
        let comparison = compare_with_journal(&report, &trades);
        println!("\n{}", comparison.to_markdown());
    }

    println!("Report: {}", report_path.display());
    println!("Artifact: {}", json_path.display());
    Ok(())
}

fn read_log(path: &Path) -> Result<ParsedLog> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read log {}", path.display()))?;
    Ok(parse_lines(String::from_utf8_lossy(&bytes).lines()))
}

fn run_ticker(log: &Path, ticker: &str) -> Result<()> {
    let parsed = read_log(log)?;
    let history = ScanHistory::from_observations(&parsed.observations);
    let ticker = ticker.trim().to_ascii_uppercase();

    let Some(t) = history.timeline(&ticker) else {
        println!("{ticker} not found in {}", log.display());
        return Ok(());
    };

    println!(
        "{ticker}: {} appearances, first {} @ ${:.2}, peak {} @ ${:.2} ({:+.1}% from first seen)",
        t.observations.len(),
        t.first_seen_time.format("%H:%M:%S"),
        t.first_seen_price,
        t.peak_time.format("%H:%M:%S"),
        t.peak_price,
        t.first_seen_gain_pct()
    );
    for obs in &t.observations {
        let score = obs.score.map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
        let change = obs
            .change_pct
            .map_or_else(|| "-".to_string(), |c| format!("{c:+.1}%"));
        println!(
            "  {}  ${:>8.2}  vol {:>6.2}M  score {:>5}  chg {:>7}",
            obs.timestamp.format("%H:%M:%S"),
            obs.price,
            obs.volume as f64 / 1_000_000.0,
            score,
            change
        );
    }
    Ok(())
}

fn run_summary(log: &Path, min_gain: f64, limit: usize) -> Result<()> {
    let parsed = read_log(log)?;
    let history = ScanHistory::from_observations(&parsed.observations);
    let stats = parsed.stats;

    println!(
        "{}: {} lines, {} observations, {} malformed, {} tickers",
        log.display(),
        stats.lines,
        stats.observations,
        stats.malformed,
        history.ticker_count()
    );
    if history.is_empty() {
        return Ok(());
    }

    println!("\nMost frequent:");
    for (ticker, count) in history.most_frequent(limit) {
        println!("  {ticker:<6} {count:>4}");
    }

    println!("\nBest performers (≥ {min_gain:.1}% from first seen):");
    for p in history.best_performers(min_gain).iter().take(limit) {
        println!(
            "  {:<6} {:+6.1}%  ${:.2} → ${:.2}",
            p.ticker, p.gain_pct, p.first_price, p.peak_price
        );
    }
    Ok(())
}

/// Resolve `--start`/`--end`: either one alone spans seven days, neither
/// means the current Monday..Sunday.
fn week_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let six_days = chrono::Duration::days(6);
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        (Some(start), None) => (start, start + six_days),
        (None, Some(end)) => (end - six_days, end),
        (None, None) => week_bounds(today),
    };
    if end < start {
        bail!("--end {end} is before --start {start}");
    }
    Ok((start, end))
}

fn run_week(journal: &Path, start: Option<&str>, end: Option<&str>, output_dir: &Path) -> Result<()> {
    let start = start.map(|s| parse_date(Some(s))).transpose()?;
    let end = end.map(|s| parse_date(Some(s))).transpose()?;
    let (start, end) = week_range(start, end, chrono::Local::now().date_naive())?;

    let trades = load_range(journal, start, end)?;
    let summary = WeeklySummary::from_entries(start, end, &trades);
    let path = write_weekly_markdown(output_dir, &summary)?;

    println!(
        "Week {start} → {end}: {} trades, {} wins, {} losses, {} breakeven",
        summary.count, summary.wins, summary.losses, summary.breakeven
    );
    println!(
        "Win rate {:.2}% | Total P/L ${:.2} | Avg ${:.2}",
        summary.win_rate, summary.total_pl, summary.avg_pl
    );
    println!("Summary: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    #[test]
    fn week_range_from_end_only_spans_the_prior_six_days() {
        assert_eq!(week_range(None, Some(day(12)), day(20)).unwrap(), (day(6), day(12)));
    }

    #[test]
    fn week_range_from_start_only_spans_the_next_six_days() {
        assert_eq!(week_range(Some(day(6)), None, day(20)).unwrap(), (day(6), day(12)));
    }

    #[test]
    fn week_range_defaults_to_the_current_week() {
        assert_eq!(week_range(None, None, day(8)).unwrap(), (day(6), day(12)));
    }

    #[test]
    fn week_range_rejects_end_before_start() {
        assert!(week_range(Some(day(12)), Some(day(6)), day(8)).is_err());
    }

    #[test]
    fn cli_parses_week_with_end_only() {
        let cli = Cli::try_parse_from(["gaplab", "week", "--end", "2025-10-12"]).unwrap();
        match cli.command {
            Commands::Week { start, end, .. } => {
                assert!(start.is_none());
                assert_eq!(end.as_deref(), Some("2025-10-12"));
            }
            _ => panic!("expected week command"),
        }
    }
}
