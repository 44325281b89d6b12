//! Core data types for the advisor system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size/quantity type.
pub type Amount = f64;

/// Side of a quote in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bid (buyer's price).
    Bid,
    /// Ask (seller's price).
    Ask,
    /// Unrecognized side token in the feed.
    Unknown,
}

impl Side {
    /// Map a raw feed token to a side.
    ///
    /// Only the exact tokens `bid` and `ask` are recognized; anything else
    /// becomes [`Side::Unknown`].
    pub fn from_token(token: &str) -> Self {
        match token {
            "bid" => Side::Bid,
            "ask" => Side::Ask,
            _ => Side::Unknown,
        }
    }

    /// Parse a side given as a query argument (case-insensitive).
    ///
    /// Returns `None` for anything but bid/ask, so `Unknown` can never be
    /// selected by name.
    pub fn parse_query(token: &str) -> Option<Self> {
        match Side::from_token(&token.trim().to_ascii_lowercase()) {
            Side::Unknown => None,
            side => Some(side),
        }
    }

    /// Feed token for this side.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
            Side::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which end of a price window to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    /// Parse `min`/`max` (case-insensitive).
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "min" => Some(Extremum::Min),
            "max" => Some(Extremum::Max),
            _ => None,
        }
    }

    /// Pick this extremum out of a price range.
    #[inline]
    pub fn select(self, range: PriceRange) -> f64 {
        match self {
            Extremum::Min => range.min,
            Extremum::Max => range.max,
        }
    }
}

impl fmt::Display for Extremum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extremum::Min => f.write_str("min"),
            Extremum::Max => f.write_str("max"),
        }
    }
}

/// One normalized price observation from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Quoted price.
    pub price: f64,
    /// Quoted amount.
    pub amount: Amount,
    /// Lexically sortable timestamp token. Never parsed as a calendar type.
    pub timestamp: String,
    /// Product identifier (case-sensitive).
    pub product: String,
    /// Bid/ask tag.
    pub side: Side,
}

impl Quote {
    /// Create a new quote.
    pub fn new(
        price: f64,
        amount: Amount,
        timestamp: impl Into<String>,
        product: impl Into<String>,
        side: Side,
    ) -> Self {
        Self {
            price,
            amount,
            timestamp: timestamp.into(),
            product: product.into(),
            side,
        }
    }

    /// Whether this quote matches a side/product/timestamp filter exactly.
    #[inline]
    pub fn matches(&self, side: Side, product: &str, timestamp: &str) -> bool {
        self.side == side && self.product == product && self.timestamp == timestamp
    }
}

/// Minimum and maximum price over a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest price.
    pub min: f64,
    /// Highest price.
    pub max: f64,
}

impl PriceRange {
    /// Distance between max and min.
    #[inline]
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }

    /// Whether a price lies within the range (inclusive).
    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}
