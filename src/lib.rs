//! nethttp_bridge library: single-call HTTP execution behind a C ABI
//!
//! This library executes exactly one HTTP GET or POST per call and reports the
//! outcome as a JSON result envelope. Requests are validated before any
//! network I/O (method whitelist, mandatory User-Agent, body ceiling), redirect
//! chains are followed manually up to a fixed bound, and the response body is
//! captured up to a configurable ceiling.
//!
//! # Example
//!
//! ```no_run
//! use nethttp_bridge::{execute_envelope, ExecutorConfig, RequestSpec};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let spec = RequestSpec::new("POST", "https://example.com/login")
//!     .headers_json(r#"{"User-Agent": "demo/1.0", "Content-Type": "application/x-www-form-urlencoded"}"#)
//!     .body("user=alice&pass=secret");
//!
//! let envelope = execute_envelope(&spec, &ExecutorConfig::default()).await;
//! println!("{}", envelope.to_json());
//! # }
//! ```
//!
//! # Requirements
//!
//! The async API requires a Tokio runtime. The C entry points in [`ffi`] start
//! and tear down their own runtime per call.

pub mod config;
mod envelope;
pub mod error_handling;
pub mod fetch;
pub mod ffi;
pub mod initialization;

// Re-export public API
pub use config::{ExecutorConfig, LogFormat, LogLevel};
pub use envelope::ResultEnvelope;
pub use error_handling::{ErrorCode, ErrorFamily, ExecutorError};
pub use fetch::redirects::RedirectPolicy;
pub use fetch::request::{HttpMethod, RequestSpec};
pub use fetch::response::{CookieRecord, ResponseSnapshot};
pub use fetch::{execute, execute_envelope};
