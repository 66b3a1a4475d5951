//! GazeTrace Common Utilities
//!
//! Shared infrastructure for all GazeTrace crates:
//! - Error types and result aliases
//! - Scoring and logging configuration
//! - Tracing/logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
