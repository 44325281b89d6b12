//! Error types for the advisor system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the advisor system.
#[derive(Error, Debug)]
pub enum Error {
    /// Navigation or earliest-timestamp query against an empty dataset.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Statistic requested over a window with no matching quotes.
    #[error("Empty window: {0}")]
    EmptyWindow(String),

    /// Caller input rejected before any computation ran.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Not enough history for the requested computation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Side token other than bid/ask.
    #[error("side '{0}' not recognized, expected 'bid' or 'ask'")]
    UnknownSide(String),

    /// Product not present in the dataset.
    #[error("product '{0}' not found in dataset")]
    UnknownProduct(String),

    /// Tick count that is not a positive integer.
    #[error("tick count '{0}' must be a positive integer")]
    InvalidTickCount(String),

    /// Extremum token other than min/max.
    #[error("extremum '{0}' not recognized, expected 'min' or 'max'")]
    UnknownExtremum(String),

    /// Timestamp that is not one of the dataset's ticks.
    #[error("timestamp '{0}' is not a tick in the dataset")]
    UnknownTimestamp(String),
}

impl Error {
    /// Create an invalid dataset error.
    pub fn invalid_dataset(msg: impl Into<String>) -> Self {
        Error::InvalidDataset(msg.into())
    }

    /// Create an empty window error.
    pub fn empty_window(msg: impl Into<String>) -> Self {
        Error::EmptyWindow(msg.into())
    }

    /// Create an insufficient data error.
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Error::InsufficientData(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Whether the error was caused by bad caller input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Whether a caller can report the error and keep the session going.
    ///
    /// Everything except I/O, JSON and configuration failures qualifies.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::EmptyWindow(_)
                | Error::InsufficientData(_)
                | Error::InvalidDataset(_)
        )
    }
}
