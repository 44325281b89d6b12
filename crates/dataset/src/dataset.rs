//! Immutable quote dataset.

use crate::navigation;
use crate::reduce;
use advisor_core::{Error, FeedConfig, PriceRange, Quote, Result, Side};
use advisor_ingestion::{FeedReader, IngestionReport, IngestionStats, LineDiagnostic};
use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// The quote sequence for a session.
///
/// Quotes are kept in feed order, which must be non-decreasing by timestamp
/// for navigation to be correct. Nothing is added, removed or mutated after
/// construction.
#[derive(Debug, Default)]
pub struct Dataset {
    /// Quotes in feed order.
    quotes: Vec<Quote>,
    /// Lazily computed set of distinct products.
    products: OnceCell<BTreeSet<String>>,
}

/// A dataset together with its ingestion outcome.
#[derive(Debug)]
pub struct Loaded {
    /// The dataset built from accepted lines.
    pub dataset: Dataset,
    /// Ingestion counters.
    pub stats: IngestionStats,
    /// Diagnostics for rejected lines (capped).
    pub diagnostics: Vec<LineDiagnostic>,
}

impl Loaded {
    fn from_report(report: IngestionReport) -> Self {
        if !report.stats.is_time_ordered() {
            warn!(
                out_of_order = report.stats.out_of_order,
                "feed is not ordered by timestamp, navigation results are unreliable"
            );
        }
        Self {
            dataset: Dataset::new(report.quotes),
            stats: report.stats,
            diagnostics: report.diagnostics,
        }
    }

    /// Number of lines dropped during ingestion.
    pub fn failures(&self) -> u64 {
        self.stats.rejected
    }
}

impl Dataset {
    /// Store an already-ordered quote sequence as-is.
    ///
    /// An empty sequence is accepted; navigation queries on it fail later.
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            products: OnceCell::new(),
        }
    }

    /// Build a dataset from raw feed lines with default feed settings.
    pub fn load<I, S>(lines: I) -> Loaded
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Loaded::from_report(FeedReader::default().read_lines(lines))
    }

    /// Build a dataset from a feed file.
    pub fn from_path(path: impl AsRef<Path>, config: &FeedConfig) -> Result<Loaded> {
        let report = FeedReader::new(config).read_path(path)?;
        let loaded = Loaded::from_report(report);
        info!(
            quotes = loaded.dataset.len(),
            failures = loaded.failures(),
            "dataset loaded"
        );
        Ok(loaded)
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether the dataset holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// All quotes in dataset order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Every distinct product, computed on first use and cached.
    pub fn unique_products(&self) -> &BTreeSet<String> {
        self.products.get_or_init(|| {
            let products: BTreeSet<String> =
                self.quotes.iter().map(|q| q.product.clone()).collect();
            debug!(count = products.len(), "cached unique products");
            products
        })
    }

    /// Quotes matching side, product and timestamp exactly.
    ///
    /// Never fails; an unmatched filter yields an empty window.
    pub fn filter(&self, side: Side, product: &str, timestamp: &str) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|q| q.matches(side, product, timestamp))
            .collect()
    }

    /// Minimum and maximum price over a window.
    pub fn min_max(&self, window: &[&Quote]) -> Result<PriceRange> {
        reduce::min_max(window)
    }

    /// Timestamp of the first quote.
    pub fn earliest_timestamp(&self) -> Result<&str> {
        self.quotes
            .first()
            .map(|q| q.timestamp.as_str())
            .ok_or_else(empty_dataset)
    }

    /// Timestamp of the last quote.
    pub fn latest_timestamp(&self) -> Result<&str> {
        self.quotes
            .last()
            .map(|q| q.timestamp.as_str())
            .ok_or_else(empty_dataset)
    }

    /// Next tick after `timestamp`, wrapping from the last tick to the first.
    pub fn next_timestamp(&self, timestamp: &str) -> Result<&str> {
        navigation::next_timestamp(&self.quotes, timestamp).ok_or_else(empty_dataset)
    }

    /// Tick before `timestamp`, wrapping from the first tick to the last.
    pub fn previous_timestamp(&self, timestamp: &str) -> Result<&str> {
        navigation::previous_timestamp(&self.quotes, timestamp).ok_or_else(empty_dataset)
    }

    /// Distinct timestamps in dataset order.
    pub fn timestamps(&self) -> impl Iterator<Item = &str> + '_ {
        navigation::distinct_timestamps(&self.quotes)
    }

    /// Number of distinct timestamps.
    pub fn tick_count(&self) -> usize {
        self.timestamps().count()
    }

    /// Number of distinct timestamps at or before `timestamp`.
    pub fn ticks_until(&self, timestamp: &str) -> usize {
        let end = navigation::upper_bound(&self.quotes, timestamp);
        navigation::distinct_timestamps(&self.quotes[..end]).count()
    }

    /// Whether `timestamp` is one of the dataset's ticks.
    pub fn contains_timestamp(&self, timestamp: &str) -> bool {
        let idx = navigation::lower_bound(&self.quotes, timestamp);
        self.quotes
            .get(idx)
            .is_some_and(|q| q.timestamp == timestamp)
    }
}

impl From<Vec<Quote>> for Dataset {
    fn from(quotes: Vec<Quote>) -> Self {
        Self::new(quotes)
    }
}

fn empty_dataset() -> Error {
    Error::invalid_dataset("dataset contains no quotes")
}
