//! Response snapshot types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A cookie set by the response, narrowed to its identity.
///
/// Browser semantics (HttpOnly, Secure, SameSite, expiry) are dropped; only
/// what a caller needs to replay the cookie survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    /// Empty when the cookie carries no Domain attribute
    pub domain: String,
    /// Empty when the cookie carries no Path attribute
    pub path: String,
}

impl From<reqwest::cookie::Cookie<'_>> for CookieRecord {
    fn from(cookie: reqwest::cookie::Cookie<'_>) -> Self {
        Self {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            domain: cookie.domain().unwrap_or_default().to_string(),
            path: cookie.path().unwrap_or_default().to_string(),
        }
    }
}

/// Bounded capture of the final HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    /// Status line, e.g. `"200 OK"`
    pub status: String,
    pub status_code: u16,
    /// Protocol version, e.g. `"HTTP/1.1"`
    pub protocol: String,
    /// URL of the final response
    pub url: String,
    /// Canonical header name to every value received, in arrival order
    pub headers: BTreeMap<String, Vec<String>>,
    /// Declared `Content-Length`, or -1 when unknown
    pub content_length: i64,
    /// Raw body bytes captured, before any UTF-8 repair of `body`
    pub body_size: usize,
    /// True when the body exceeded the ceiling and was cut
    pub truncated: bool,
    pub cookies: Vec<CookieRecord>,
    pub server: String,
    pub content_type: String,
    pub date: String,
    /// Captured body as text. Invalid UTF-8, including a multi-byte character
    /// cut by the ceiling, is replaced with U+FFFD, so `body.len()` can exceed
    /// `body_size`.
    pub body: String,
    /// Every URL requested, most recent first
    pub redirects: Vec<String>,
}

impl ResponseSnapshot {
    /// First value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }
}
