//! Analyzer thresholds, window caps and the open reference policy.
//!
//! Loaded from TOML (every field optional, defaults below) and validated once
//! before analysis starts. The analyzer never reads configuration from
//! anywhere else.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::Ticker;

/// Errors raised while loading or validating an [`AnalysisConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which price a trajectory's gain is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenReference {
    /// Price of the ticker's first observation.
    FirstSeen,
    /// First `open=` value the scanner printed, else the first observation.
    #[default]
    LoggedOpen,
    /// First `prev=` value the scanner printed, else the first observation.
    PriorClose,
}

/// Immutable per-run configuration for the EOD analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Tickers first seen at or after this time are not catchable.
    #[serde(with = "hhmm")]
    pub late_day_cutoff: NaiveTime,
    /// Minimum max-volume (shares) for a ticker to count as liquid.
    pub liquidity_floor: u64,
    /// Minimum minutes between first sighting and peak.
    pub min_reaction_minutes: u32,
    /// Minimum open-to-peak gain, in percent.
    pub min_gain_pct: f64,
    /// Entry window duration cap, in minutes from first sighting.
    pub entry_window_minutes: u32,
    /// Entry window observation count cap.
    pub entry_window_max_observations: usize,
    /// Exit band below the peak, in percent of the peak price.
    pub exit_tolerance_pct: f64,
    /// Number of opportunities in the primary report.
    pub top_n: usize,
    pub open_reference: OpenReference,
    /// Externally supplied open prices; these win over `open_reference`.
    pub open_references: BTreeMap<Ticker, f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            late_day_cutoff: NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default(),
            liquidity_floor: 1_000_000,
            min_reaction_minutes: 5,
            min_gain_pct: 8.0,
            entry_window_minutes: 30,
            entry_window_max_observations: 10,
            exit_tolerance_pct: 2.0,
            top_n: 5,
            open_reference: OpenReference::default(),
            open_references: BTreeMap::new(),
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the analysis meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_window_minutes == 0 {
            return Err(invalid("entry_window_minutes", "must be positive"));
        }
        if self.entry_window_max_observations == 0 {
            return Err(invalid("entry_window_max_observations", "must be positive"));
        }
        if self.top_n == 0 {
            return Err(invalid("top_n", "must be positive"));
        }
        if !self.min_gain_pct.is_finite() || self.min_gain_pct < 0.0 {
            return Err(invalid(
                "min_gain_pct",
                format!("must be a non-negative number, got {}", self.min_gain_pct),
            ));
        }
        if !self.exit_tolerance_pct.is_finite()
            || self.exit_tolerance_pct < 0.0
            || self.exit_tolerance_pct >= 100.0
        {
            return Err(invalid(
                "exit_tolerance_pct",
                format!("must be in [0, 100), got {}", self.exit_tolerance_pct),
            ));
        }
        for (ticker, price) in &self.open_references {
            if !price.is_finite() || *price <= 0.0 {
                return Err(invalid(
                    "open_references",
                    format!("reference for {ticker} must be a positive price, got {price}"),
                ));
            }
        }
        Ok(())
    }

    pub fn min_reaction(&self) -> Duration {
        Duration::minutes(i64::from(self.min_reaction_minutes))
    }

    pub fn entry_window_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.entry_window_minutes))
    }

    /// Exit band as a fraction (2% → 0.02).
    pub fn exit_tolerance(&self) -> f64 {
        self.exit_tolerance_pct / 100.0
    }

    /// BLAKE3 over the JSON form. Equal hashes mean equal thresholds.
    pub fn config_hash(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_else(|_| format!("{self:?}").into_bytes());
        blake3::hash(&bytes).to_hex().to_string()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// `HH:MM` (or `HH:MM:SS`) time-of-day serde format.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(|e| serde::de::Error::custom(format!("invalid time `{raw}`: {e}")))
    }
}
