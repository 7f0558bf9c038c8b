//! Configuration constants.
//!
//! This module defines the limits and defaults used by the executor. Every
//! value here can be overridden at runtime through [`ExecutorConfig`](super::ExecutorConfig),
//! except the method whitelist, which is fixed.

// Response and body size limits
/// Maximum response body size in bytes (5 MiB)
/// Bytes beyond this ceiling are discarded and the snapshot is marked truncated
pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;
/// Maximum request body size in bytes (5 MiB)
pub const MAX_REQUEST_BODY_SIZE: usize = 5 * 1024 * 1024;

// Redirect handling
/// Maximum number of requests in a redirect chain before the executor gives up.
/// The redirect decision that would make the chain reach this length fails.
pub const MAX_REDIRECT_HOPS: usize = 5;

// Network operation timeouts
/// Total per-call timeout in seconds (connect + send + body read)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Content type whose bodies are re-encoded canonically before sending.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Proxy URL schemes accepted by the transport selector.
pub const PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

// Environment variable names read by `ExecutorConfig::from_env`
pub const ENV_MAX_RESPONSE_BYTES: &str = "NETHTTP_MAX_RESPONSE_BYTES";
pub const ENV_MAX_REQUEST_BYTES: &str = "NETHTTP_MAX_REQUEST_BYTES";
pub const ENV_MAX_REDIRECTS: &str = "NETHTTP_MAX_REDIRECTS";
pub const ENV_TIMEOUT_SECS: &str = "NETHTTP_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "NETHTTP_CONNECT_TIMEOUT_SECS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "NETHTTP_ACCEPT_INVALID_CERTS";
pub const ENV_STRIP_SENSITIVE_HEADERS: &str = "NETHTTP_STRIP_SENSITIVE_HEADERS";
