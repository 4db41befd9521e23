//! handlens common utilities
//!
//! Shared infrastructure for all handlens crates:
//! - Error taxonomy and result alias
//! - Session clock and frame pacing
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
