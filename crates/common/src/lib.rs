//! Tapwise Common Utilities
//!
//! Shared infrastructure for all Tapwise crates:
//! - Error types and result aliases
//! - Monotonic clocks (system and manually driven)
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
