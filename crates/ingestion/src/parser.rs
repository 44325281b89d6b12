//! Feed line parsing.
//!
//! A feed record is `timestamp,product,side,price,amount`.

use advisor_core::{Quote, Side};
use thiserror::Error;

/// Number of fields in a feed record.
pub const FIELD_COUNT: usize = 5;

/// Why a feed line was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Wrong number of delimited fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// A required text field was empty.
    #[error("{field} is empty")]
    EmptyField { field: &'static str },

    /// A numeric field did not parse.
    #[error("{field} '{value}' is not a number")]
    InvalidNumber { field: &'static str, value: String },

    /// The raw line was not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// A numeric field parsed to NaN or infinity.
    #[error("{field} '{value}' is not finite")]
    NonFinite { field: &'static str, value: String },
}

/// Parse one feed line into a quote.
///
/// Fields are trimmed. Unrecognized side tokens are kept as
/// [`Side::Unknown`] rather than rejected.
pub fn parse_line(line: &str, delimiter: char) -> Result<Quote, LineError> {
    let fields: Vec<&str> = line
        .trim_end_matches(['\r', '\n'])
        .split(delimiter)
        .map(str::trim)
        .collect();

    if fields.len() != FIELD_COUNT {
        return Err(LineError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let timestamp = non_empty(fields[0], "timestamp")?;
    let product = non_empty(fields[1], "product")?;
    let side = Side::from_token(fields[2]);
    let price = parse_number(fields[3], "price")?;
    let amount = parse_number(fields[4], "amount")?;

    Ok(Quote::new(price, amount, timestamp, product, side))
}

fn non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str, LineError> {
    if value.is_empty() {
        Err(LineError::EmptyField { field })
    } else {
        Ok(value)
    }
}

fn parse_number(value: &str, field: &'static str) -> Result<f64, LineError> {
    let number: f64 = value.parse().map_err(|_| LineError::InvalidNumber {
        field,
        value: value.to_string(),
    })?;

    if !number.is_finite() {
        return Err(LineError::NonFinite {
            field,
            value: value.to_string(),
        });
    }
    Ok(number)
}
