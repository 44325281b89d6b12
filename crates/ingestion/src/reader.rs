//! Line-oriented feed reader.
//!
//! Malformed lines are dropped with a diagnostic; ingestion never aborts on
//! bad data. Timestamp ordering is observed but not enforced.

use crate::parser::{parse_line, LineError};
use advisor_core::{FeedConfig, Quote, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

/// Statistics about an ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionStats {
    /// Lines seen, including blank and rejected ones.
    pub lines_read: u64,
    /// Lines turned into quotes.
    pub accepted: u64,
    /// Malformed lines dropped.
    pub rejected: u64,
    /// Blank lines skipped.
    pub blank: u64,
    /// Accepted quotes whose timestamp sorts before the previous quote's.
    pub out_of_order: u64,
}

impl IngestionStats {
    /// Fraction of non-blank lines that were rejected.
    pub fn rejected_frac(&self) -> f64 {
        let considered = self.accepted + self.rejected;
        if considered > 0 {
            self.rejected as f64 / considered as f64
        } else {
            0.0
        }
    }

    /// Whether accepted quotes arrived in non-decreasing timestamp order.
    pub fn is_time_ordered(&self) -> bool {
        self.out_of_order == 0
    }
}

/// A rejected line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number.
    pub line_no: u64,
    /// Reason for rejection.
    pub error: LineError,
}

/// Result of an ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    /// Accepted quotes, in feed order.
    pub quotes: Vec<Quote>,
    /// Counters.
    pub stats: IngestionStats,
    /// Retained diagnostics, capped at the configured maximum.
    pub diagnostics: Vec<LineDiagnostic>,
}

impl IngestionReport {
    /// Number of rejected lines (not capped like `diagnostics`).
    pub fn failures(&self) -> u64 {
        self.stats.rejected
    }
}

/// Feed reader turning raw lines into quotes.
pub struct FeedReader {
    delimiter: char,
    max_line_errors: usize,
}

impl Default for FeedReader {
    fn default() -> Self {
        Self::new(&FeedConfig::default())
    }
}

impl FeedReader {
    /// Create a reader from feed configuration.
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            delimiter: config.delimiter,
            max_line_errors: config.max_line_errors,
        }
    }

    /// Read a feed file from disk.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<IngestionReport> {
        let path = path.as_ref();
        let file = File::open(path)?;
        info!(path = %path.display(), "reading feed");
        self.read_reader(file)
    }

    /// Read a feed from any byte source.
    ///
    /// Only I/O failures abort; malformed lines, including ones that are not
    /// valid UTF-8, are recorded and skipped.
    pub fn read_reader<R: Read>(&self, source: R) -> Result<IngestionReport> {
        let mut report = IngestionReport::default();
        for (idx, raw) in BufReader::new(source).split(b'\n').enumerate() {
            let raw = raw?;
            let line_no = idx as u64 + 1;
            match std::str::from_utf8(&raw) {
                Ok(line) => self.ingest_line(&mut report, line_no, line),
                Err(_) => {
                    report.stats.lines_read += 1;
                    self.reject(&mut report, line_no, LineError::InvalidUtf8);
                }
            }
        }
        Self::log_summary(&report);
        Ok(report)
    }

    /// Ingest an in-memory sequence of raw lines.
    pub fn read_lines<I, S>(&self, lines: I) -> IngestionReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = IngestionReport::default();
        for (idx, line) in lines.into_iter().enumerate() {
            self.ingest_line(&mut report, idx as u64 + 1, line.as_ref());
        }
        Self::log_summary(&report);
        report
    }

    fn ingest_line(&self, report: &mut IngestionReport, line_no: u64, line: &str) {
        report.stats.lines_read += 1;

        if line.trim().is_empty() {
            report.stats.blank += 1;
            return;
        }

        match parse_line(line, self.delimiter) {
            Ok(quote) => {
                if let Some(prev) = report.quotes.last() {
                    if quote.timestamp < prev.timestamp {
                        report.stats.out_of_order += 1;
                        warn!(
                            line_no,
                            timestamp = %quote.timestamp,
                            previous = %prev.timestamp,
                            "feed timestamp out of order"
                        );
                    }
                }
                report.stats.accepted += 1;
                report.quotes.push(quote);
            }
            Err(error) => self.reject(report, line_no, error),
        }
    }

    fn reject(&self, report: &mut IngestionReport, line_no: u64, error: LineError) {
        warn!(line_no, %error, "dropping malformed feed line");
        report.stats.rejected += 1;
        if report.diagnostics.len() < self.max_line_errors {
            report.diagnostics.push(LineDiagnostic { line_no, error });
        }
    }

    fn log_summary(report: &IngestionReport) {
        info!(
            accepted = report.stats.accepted,
            rejected = report.stats.rejected,
            out_of_order = report.stats.out_of_order,
            "feed ingestion complete"
        );
    }
}
