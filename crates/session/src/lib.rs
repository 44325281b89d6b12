//! Simulated-time session for the advisor system.
//!
//! This crate handles:
//! - Holding the current-time cursor over a loaded dataset
//! - Stepping through ticks in circular order
//! - Running analytics queries at the cursor

pub mod session;

pub use session::{Opened, Session, Step};
