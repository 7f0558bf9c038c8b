//! Error categorization.
//!
//! Turns transport errors from `reqwest` into executor errors at the point
//! where they occur.

use super::types::{ExecutorError, NetworkFailureKind};

/// Categorizes a `reqwest::Error` raised while sending a request.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
///
/// # Returns
///
/// The coarse cause used to label the network failure.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> NetworkFailureKind {
    if error.is_timeout() {
        NetworkFailureKind::Timeout
    } else if error.is_connect() {
        NetworkFailureKind::Connect
    } else if error.is_request() || error.is_builder() {
        NetworkFailureKind::Request
    } else {
        NetworkFailureKind::Other
    }
}

/// Wraps a send-phase transport error.
pub(crate) fn network_error(error: reqwest::Error) -> ExecutorError {
    let kind = categorize_reqwest_error(&error);
    ExecutorError::Network {
        kind,
        source: error,
    }
}
