//! HTTP response capture.
//!
//! This module turns the final response of a chain into a bounded,
//! serializable snapshot.

mod extract;
mod types;

pub(crate) use extract::capture_response;
pub use extract::{canonical_header_name, extract_headers};
pub use types::{CookieRecord, ResponseSnapshot};
