//! Session state.
//!
//! Owns the dataset and the simulated current time. Advancing the cursor is
//! the only mutation; every query reads the cursor and delegates to
//! [`Analytics`].

use advisor_analytics::{Analytics, AverageReport, Prediction};
use advisor_core::{AnalyticsConfig, Config, Error, Result, ValidationError};
use advisor_dataset::Dataset;
use advisor_ingestion::{IngestionStats, LineDiagnostic};
use serde::Serialize;
use tracing::{debug, info};

/// One cursor movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Tick before the move.
    pub from: String,
    /// Tick after the move.
    pub to: String,
    /// Whether the move went from the last tick back to the first.
    pub wrapped: bool,
}

/// A session opened from configuration, with its ingestion outcome.
#[derive(Debug)]
pub struct Opened {
    pub session: Session,
    pub stats: IngestionStats,
    pub diagnostics: Vec<LineDiagnostic>,
}

/// Simulated-time session over a dataset.
#[derive(Debug)]
pub struct Session {
    dataset: Dataset,
    config: AnalyticsConfig,
    /// Current simulated time. Always a tick of `dataset`.
    cursor: String,
    /// Number of advances since creation or the last reset.
    steps: u64,
}

impl Session {
    /// Start a session at the earliest tick.
    ///
    /// Fails on an empty dataset.
    pub fn new(dataset: Dataset, config: &AnalyticsConfig) -> Result<Self> {
        let cursor = dataset.earliest_timestamp()?.to_string();
        Ok(Self {
            dataset,
            config: config.clone(),
            cursor,
            steps: 0,
        })
    }

    /// Load the configured feed and start a session over it.
    pub fn open(config: &Config) -> Result<Opened> {
        config.validate()?;
        let path = config
            .feed
            .path
            .as_ref()
            .ok_or_else(|| Error::config("feed.path is not set"))?;

        let loaded = Dataset::from_path(path, &config.feed)?;
        let session = Session::new(loaded.dataset, &config.analytics)?;
        info!(
            start = session.current_time(),
            ticks = session.dataset.tick_count(),
            products = session.dataset.unique_products().len(),
            "session opened"
        );

        Ok(Opened {
            session,
            stats: loaded.stats,
            diagnostics: loaded.diagnostics,
        })
    }

    pub fn current_time(&self) -> &str {
        &self.cursor
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Query engine over this session's dataset.
    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(&self.dataset, &self.config)
    }

    /// Products available for querying, sorted.
    pub fn products(&self) -> Vec<&str> {
        self.analytics().products()
    }

    /// Move the cursor to the next tick, wrapping after the last.
    pub fn advance(&mut self) -> Result<Step> {
        let to = self.dataset.next_timestamp(&self.cursor)?.to_string();
        let from = std::mem::replace(&mut self.cursor, to.clone());
        let wrapped = to <= from;
        self.steps += 1;

        debug!(from = %from, to = %to, wrapped, step = self.steps, "session advanced");
        Ok(Step { from, to, wrapped })
    }

    /// Move the cursor back to the earliest tick.
    pub fn reset(&mut self) -> Result<()> {
        self.cursor = self.dataset.earliest_timestamp()?.to_string();
        self.steps = 0;
        debug!(to = %self.cursor, "session reset");
        Ok(())
    }

    /// Jump the cursor to an existing tick.
    pub fn seek(&mut self, timestamp: &str) -> Result<()> {
        if !self.dataset.contains_timestamp(timestamp) {
            return Err(ValidationError::UnknownTimestamp(timestamp.to_string()).into());
        }
        self.cursor = timestamp.to_string();
        debug!(to = timestamp, "session seek");
        Ok(())
    }

    /// Lowest `side` price for `product` at the current tick.
    pub fn min(&self, side: &str, product: &str) -> Result<f64> {
        self.analytics().min(side, product, &self.cursor)
    }

    /// Highest `side` price for `product` at the current tick.
    pub fn max(&self, side: &str, product: &str) -> Result<f64> {
        self.analytics().max(side, product, &self.cursor)
    }

    /// Average over the last `ticks` ticks ending at the current tick.
    pub fn average(&self, side: &str, product: &str, ticks: &str) -> Result<f64> {
        self.analytics().average(side, product, &self.cursor, ticks)
    }

    pub fn average_report(&self, side: &str, product: &str, ticks: &str) -> Result<AverageReport> {
        self.analytics()
            .average_report(side, product, &self.cursor, ticks)
    }

    /// Median over the last `ticks` ticks ending at the current tick.
    pub fn median(&self, side: &str, product: &str, ticks: &str) -> Result<f64> {
        self.analytics().median(side, product, &self.cursor, ticks)
    }

    /// Predicted min or max for the tick after the current one.
    pub fn predict(&self, product: &str, extremum: &str, side: &str) -> Result<f64> {
        self.analytics().predict(product, extremum, side, &self.cursor)
    }

    pub fn prediction(&self, product: &str, extremum: &str, side: &str) -> Result<Prediction> {
        self.analytics()
            .prediction(product, extremum, side, &self.cursor)
    }
}
