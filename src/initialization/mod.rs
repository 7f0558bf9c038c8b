//! Per-call resource setup.
//!
//! This module provides functions to initialize:
//! - The HTTP transport (direct or proxied) for a single call
//! - The process logger

mod client;
mod logger;

// Re-export public API
pub use client::{init_client, Transport};
pub use logger::init_logger_with;
