//! Configuration structures for the advisor system.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Punctuation that can occur inside a feed field.
const FIELD_PUNCTUATION: &str = "/:.-+\"";

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed ingestion configuration.
    pub feed: FeedConfig,
    /// Analytics configuration.
    pub analytics: AnalyticsConfig,
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the configuration for values the system cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.analytics.prediction_ticks == 0 {
            return Err(Error::config("analytics.prediction_ticks must be positive"));
        }
        let d = self.feed.delimiter;
        let usable = d == '\t' || (d.is_ascii_punctuation() && !FIELD_PUNCTUATION.contains(d));
        if !usable {
            return Err(Error::config(format!(
                "feed.delimiter {d:?} cannot separate feed fields"
            )));
        }
        Ok(())
    }
}

/// Feed ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Path of the feed file to load.
    pub path: Option<PathBuf>,
    /// Field delimiter.
    pub delimiter: char,
    /// Maximum number of per-line diagnostics to retain.
    pub max_line_errors: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: ',',
            max_line_errors: 100,
        }
    }
}

/// Behaviour when a prediction lookback runs past the first tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Fail with insufficient data.
    Strict,
    /// Keep walking backward through the circular history.
    Wrap,
}

/// Analytics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Number of ticks folded into a prediction.
    pub prediction_ticks: usize,
    /// What to do when fewer ticks than that precede the prediction time.
    pub short_history: HistoryPolicy,
}

impl AnalyticsConfig {
    /// EWMA smoothing factor, `2 / (N + 1)`.
    #[inline]
    pub fn smoothing_factor(&self) -> f64 {
        2.0 / (self.prediction_ticks as f64 + 1.0)
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            prediction_ticks: 10,
            short_history: HistoryPolicy::Strict,
        }
    }
}
