//! HTTP header name constants.
//!
//! Names the executor looks up in caller-supplied headers and in responses.

/// Identification header every caller must supply
pub const HEADER_USER_AGENT: &str = "User-Agent";
/// Declares the request body encoding (drives form normalization)
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

// Credential-bearing headers
/// Authorization header
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// Cookie header
pub const HEADER_COOKIE: &str = "Cookie";
/// Proxy-Authorization header
pub const HEADER_PROXY_AUTHORIZATION: &str = "Proxy-Authorization";

/// Headers removed when `strip_sensitive_headers` is enabled, and always
/// removed when a followed redirect leaves the original origin.
pub const SENSITIVE_HEADERS: &[&str] = &[
    HEADER_AUTHORIZATION,
    HEADER_COOKIE,
    HEADER_PROXY_AUTHORIZATION,
];
