//! Windowed analytics over the quote dataset.
//!
//! This crate handles:
//! - Input validation (side, product, tick count, extremum)
//! - Backward tick walks over the circular history
//! - Min/max, average and median over tick windows
//! - EWMA-based next-tick price prediction

pub mod engine;
pub mod ewma;
pub mod lookback;
pub mod stats;
pub mod validation;

pub use engine::{Analytics, AverageReport, Prediction, TickAverage};
pub use ewma::Ewma;
pub use lookback::Lookback;
pub use validation::{validate_extremum, validate_product, validate_side, validate_tick_count};
