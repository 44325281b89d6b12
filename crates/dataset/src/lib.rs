//! In-memory quote dataset for the advisor system.
//!
//! This crate handles:
//! - Owning the ingested, timestamp-ordered quote sequence
//! - Product enumeration and exact side/product/timestamp filtering
//! - Min/max price reduction over a window
//! - Circular timestamp navigation by bound search

pub mod dataset;
pub mod navigation;
pub mod reduce;

pub use dataset::{Dataset, Loaded};
pub use reduce::{min_max, min_max_prices};
