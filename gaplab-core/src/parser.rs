//! Snapshot parser: scanner log lines to [`Observation`]s.
//!
//! The scanner logs one line per ticker per cycle:
//!
//! ```text
//! 2025-10-08 15:36:22,193 [INFO]    SNAP: score=149.9 chg=+2.4% last=8.38 open=8.18 vol=104.9M [active_30min_window]
//! 2025-10-03 09:41:02,004 [INFO]    ABCD: score=88.1 gap=+31.2% last=4.12 prev=3.14 vol=2.1M
//! ```
//!
//! Fields after `TICKER:` are read by name, so column order and extra fields
//! do not matter. `last` and `vol` are required. Every other shape problem is
//! reported as a [`ParseError`] for that line only; the rest of the log is
//! still parsed.

use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

use crate::domain::Observation;

static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})(?:,(\d{3}))?(?:\s+(.*))?$")
        .expect("timestamp pattern is valid")
});

static TICKER_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)([A-Z][A-Z0-9.]{0,9}):\s+(\S.*)$").expect("ticker pattern is valid")
});

/// Why a single log line could not be turned into an observation.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ParseError {
    #[error("line has no leading timestamp")]
    MissingTimestamp,

    #[error("invalid timestamp `{0}`")]
    BadTimestamp(String),

    #[error("{ticker}: missing required field `{field}`")]
    MissingField { ticker: String, field: String },

    #[error("{ticker}: field `{field}` has invalid value `{value}`")]
    BadValue {
        ticker: String,
        field: String,
        value: String,
    },
}

/// Classification of one successfully read line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Observation(Observation),
    /// Well-formed log line that carries no ticker observation.
    Noise,
    Blank,
}

/// A line that was skipped, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalformedLine {
    /// 1-based line number in the log.
    pub line_no: usize,
    pub error: ParseError,
}

/// Line counts for one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Non-blank lines seen.
    pub lines: usize,
    pub observations: usize,
    pub noise: usize,
    pub malformed: usize,
}

/// Result of parsing a whole log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    /// Observations in log order.
    pub observations: Vec<Observation>,
    pub stats: ParseStats,
    pub malformed: Vec<MalformedLine>,
}

/// Parse every line, skipping and recording the malformed ones.
pub fn parse_lines<I, S>(lines: I) -> ParsedLog
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedLog::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let line_no = idx + 1;
        match parse_line(line.as_ref()) {
            Ok(LineKind::Blank) => {}
            Ok(LineKind::Noise) => {
                parsed.stats.lines += 1;
                parsed.stats.noise += 1;
            }
            Ok(LineKind::Observation(obs)) => {
                parsed.stats.lines += 1;
                parsed.stats.observations += 1;
                parsed.observations.push(obs);
            }
            Err(error) => {
                tracing::debug!(line_no, %error, "skipping malformed log line");
                parsed.stats.lines += 1;
                parsed.stats.malformed += 1;
                parsed.malformed.push(MalformedLine { line_no, error });
            }
        }
    }

    parsed
}

/// Parse one log line.
pub fn parse_line(line: &str) -> Result<LineKind, ParseError> {
    let line = line.trim_end();
    if line.trim().is_empty() {
        return Ok(LineKind::Blank);
    }

    let caps = PREFIX
        .captures(line)
        .ok_or(ParseError::MissingTimestamp)?;
    let timestamp = parse_timestamp(&caps[1], caps.get(2).map(|m| m.as_str()))?;
    let rest = caps.get(3).map_or("", |m| m.as_str());

    let Some(body) = TICKER_BODY.captures(rest) else {
        return Ok(LineKind::Noise);
    };
    let ticker = &body[1];
    let fields = &body[2];

    // A ticker line without any key=value pairs is a free-text message.
    if !fields.split_whitespace().any(|tok| tok.contains('=')) {
        return Ok(LineKind::Noise);
    }

    parse_fields(timestamp, ticker, fields).map(LineKind::Observation)
}

fn parse_timestamp(date_time: &str, millis: Option<&str>) -> Result<NaiveDateTime, ParseError> {
    let base = NaiveDateTime::parse_from_str(date_time, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| ParseError::BadTimestamp(date_time.to_string()))?;
    let ms = match millis {
        Some(ms) => ms
            .parse::<i64>()
            .map_err(|_| ParseError::BadTimestamp(format!("{date_time},{ms}")))?,
        None => 0,
    };
    Ok(base + Duration::milliseconds(ms))
}

fn parse_fields(
    timestamp: NaiveDateTime,
    ticker: &str,
    fields: &str,
) -> Result<Observation, ParseError> {
    let mut price = None;
    let mut volume = None;
    let mut open = None;
    let mut prev_close = None;
    let mut change_pct = None;
    let mut score = None;

    for token in fields.split_whitespace() {
        if token.starts_with('[') {
            continue;
        }
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let bad = || ParseError::BadValue {
            ticker: ticker.to_string(),
            field: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "last" => set_once(&mut price, parse_price(value).ok_or_else(bad)?),
            "vol" => set_once(&mut volume, parse_volume(value).ok_or_else(bad)?),
            "open" => {
                if let Some(p) = parse_reference(value).ok_or_else(bad)? {
                    set_once(&mut open, p);
                }
            }
            "prev" => {
                if let Some(p) = parse_reference(value).ok_or_else(bad)? {
                    set_once(&mut prev_close, p);
                }
            }
            "chg" | "gap" => set_once(&mut change_pct, parse_percent(value).ok_or_else(bad)?),
            "score" => set_once(&mut score, parse_number(value).ok_or_else(bad)?),
            _ => {}
        }
    }

    let missing = |field: &str| ParseError::MissingField {
        ticker: ticker.to_string(),
        field: field.to_string(),
    };

    Ok(Observation {
        timestamp,
        ticker: ticker.to_string(),
        price: price.ok_or_else(|| missing("last"))?,
        volume: volume.ok_or_else(|| missing("vol"))?,
        open,
        prev_close,
        change_pct,
        score,
    })
}

/// First occurrence of a key wins.
fn set_once<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim_start_matches('+')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_price(raw: &str) -> Option<f64> {
    parse_number(raw.trim_start_matches('$')).filter(|p| *p > 0.0)
}

/// Reference prices print as `0.00` before the first trade; zero means absent.
fn parse_reference(raw: &str) -> Option<Option<f64>> {
    parse_number(raw.trim_start_matches('$'))
        .filter(|p| *p >= 0.0)
        .map(|p| (p > 0.0).then_some(p))
}

fn parse_percent(raw: &str) -> Option<f64> {
    parse_number(raw.trim_end_matches('%'))
}

/// `104.9M` → 104_900_000. Plain numbers are shares.
pub fn parse_volume(raw: &str) -> Option<u64> {
    let (number, multiplier) = match raw.chars().last()? {
        'K' | 'k' => (&raw[..raw.len() - 1], 1_000.0),
        'M' | 'm' => (&raw[..raw.len() - 1], 1_000_000.0),
        'B' | 'b' => (&raw[..raw.len() - 1], 1_000_000_000.0),
        _ => (raw, 1.0),
    };
    let shares = parse_number(number)? * multiplier;
    if shares < 0.0 || shares > u64::MAX as f64 {
        return None;
    }
    Some(shares.round() as u64)
}
