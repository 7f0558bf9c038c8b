//! Executor configuration and constants.
//!
//! This module provides:
//! - Configuration constants (limits, timeouts, environment variable names)
//! - HTTP header name constants
//! - The runtime `ExecutorConfig` and logging option types

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{ConfigValidationError, ExecutorConfig, LogFormat, LogLevel};
