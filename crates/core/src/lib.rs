//! Core types and configuration for the advisor system.
//!
//! This crate provides shared types used across all other crates:
//! - Market data types (quotes, sides, price ranges)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{AnalyticsConfig, Config, FeedConfig, HistoryPolicy};
pub use error::{Error, Result, ValidationError};
pub use types::*;
