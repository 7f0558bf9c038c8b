//! Error handling.
//!
//! This module provides:
//! - `ExecutorError`, the tagged failure of one executor call
//! - `ErrorCode`, the stable numeric taxonomy reported to callers
//! - Categorization of transport errors

mod categorization;
mod types;

pub use categorization::categorize_reqwest_error;
pub(crate) use categorization::network_error;
pub use types::{ErrorCode, ErrorFamily, ExecutorError, InitializationError, NetworkFailureKind};
