//! Feed ingestion for the advisor system.
//!
//! This crate handles:
//! - Parsing comma-delimited feed lines into quotes
//! - Per-line diagnostics for malformed records
//! - Ingestion statistics (accepted, rejected, out-of-order)

pub mod parser;
pub mod reader;

pub use parser::{parse_line, LineError, FIELD_COUNT};
pub use reader::{FeedReader, IngestionReport, IngestionStats, LineDiagnostic};
