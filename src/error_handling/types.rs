//! Error type definitions.
//!
//! This module defines the executor error, the stable numeric codes callers
//! branch on, and the sub-kinds used to describe network failures.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Failure of a single executor call.
///
/// Each variant is constructed at the site where the failure happens and maps
/// to exactly one [`ErrorCode`]; nothing is classified by inspecting message
/// text.
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// Method outside the GET/POST whitelist.
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// Header JSON is malformed, not a flat string map, or holds an invalid
    /// header name/value.
    #[error("failed to parse headers: {0}")]
    HeaderParse(String),

    /// No identification header was supplied.
    #[error("the User-Agent header is required")]
    MissingIdentification,

    /// Proxy URL could not be parsed or is not usable as a proxy.
    #[error("invalid proxy URL{}: {reason}", quoted_proxy(.url))]
    ProxyConfig {
        /// Proxy URL with any userinfo removed; `None` when it did not parse
        url: Option<String>,
        /// Why it was rejected
        reason: String,
    },

    /// Request body is larger than the configured ceiling.
    #[error("request body size exceeds limit: {size} bytes (max {limit})")]
    BodySizeExceeded {
        /// Size of the rejected body
        size: usize,
        /// Configured ceiling
        limit: usize,
    },

    /// Target URL is not an absolute http(s) URL.
    #[error("invalid target URL {url:?}: {reason}")]
    InvalidUrl {
        /// Target URL as supplied by the caller
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The redirect chain hit the configured hop limit.
    #[error("stopped after {0} redirects")]
    RedirectExceeded(usize),

    /// The request could not be sent or no response head was received.
    #[error("network error ({kind}): {source}")]
    Network {
        /// Coarse cause derived from the transport error
        kind: NetworkFailureKind,
        /// Underlying transport error
        #[source]
        source: ReqwestError,
    },

    /// The response head arrived but the body stream failed.
    #[error("failed to read response body: {0}")]
    ReadResponse(#[source] ReqwestError),

    /// Anything else (client construction failure, caught panic, ...).
    #[error("{0}")]
    Unknown(String),
}

fn quoted_proxy(url: &Option<String>) -> String {
    url.as_ref().map(|u| format!(" {u:?}")).unwrap_or_default()
}

impl ExecutorError {
    /// Returns the stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExecutorError::InvalidMethod(_) => ErrorCode::InvalidMethod,
            ExecutorError::HeaderParse(_) => ErrorCode::HeaderParse,
            ExecutorError::MissingIdentification => ErrorCode::MissingUserAgent,
            ExecutorError::ProxyConfig { .. } => ErrorCode::ProxyConfig,
            ExecutorError::BodySizeExceeded { .. } => ErrorCode::BodySize,
            ExecutorError::InvalidUrl { .. } => ErrorCode::InvalidUrl,
            ExecutorError::RedirectExceeded(_) => ErrorCode::RedirectExceeded,
            ExecutorError::Network { .. } => ErrorCode::Network,
            ExecutorError::ReadResponse(_) => ErrorCode::ReadResponse,
            ExecutorError::Unknown(_) => ErrorCode::Unknown,
        }
    }

    /// True for failures detected before any network I/O.
    pub fn is_validation(&self) -> bool {
        self.code().family() == ErrorFamily::Caller
    }
}

/// Stable numeric error codes reported in the result envelope.
///
/// The thousands digit is the family: 3xxx redirect, 4xxx caller input,
/// 5xxx transport/server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorCode {
    RedirectExceeded,
    InvalidMethod,
    HeaderParse,
    MissingUserAgent,
    ProxyConfig,
    BodySize,
    InvalidUrl,
    Unknown,
    Network,
    ReadResponse,
}

/// Error code families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorFamily {
    /// 3xxx
    Redirect,
    /// 4xxx
    Caller,
    /// 5xxx
    Transport,
}

impl ErrorCode {
    /// Numeric value emitted as `error_code`.
    pub const fn as_u16(self) -> u16 {
        match self {
            ErrorCode::RedirectExceeded => 3001,
            ErrorCode::InvalidMethod => 4001,
            ErrorCode::HeaderParse => 4002,
            ErrorCode::MissingUserAgent => 4003,
            ErrorCode::ProxyConfig => 4004,
            ErrorCode::BodySize => 4005,
            ErrorCode::InvalidUrl => 4006,
            ErrorCode::Unknown => 5000,
            ErrorCode::Network => 5001,
            ErrorCode::ReadResponse => 5002,
        }
    }

    pub fn family(self) -> ErrorFamily {
        match self.as_u16() / 1000 {
            3 => ErrorFamily::Redirect,
            4 => ErrorFamily::Caller,
            _ => ErrorFamily::Transport,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::RedirectExceeded => "Redirect limit exceeded",
            ErrorCode::InvalidMethod => "Invalid HTTP method",
            ErrorCode::HeaderParse => "Header parse error",
            ErrorCode::MissingUserAgent => "Missing User-Agent",
            ErrorCode::ProxyConfig => "Proxy configuration error",
            ErrorCode::BodySize => "Body size exceeded",
            ErrorCode::InvalidUrl => "Invalid target URL",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::Network => "Network error",
            ErrorCode::ReadResponse => "Response read error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.as_u16())
    }
}

/// Coarse cause of a network failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum NetworkFailureKind {
    Timeout,
    Connect,
    Request,
    Other,
}

impl NetworkFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkFailureKind::Timeout => "timeout",
            NetworkFailureKind::Connect => "connect",
            NetworkFailureKind::Request => "request",
            NetworkFailureKind::Other => "other",
        }
    }
}

impl std::fmt::Display for NetworkFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
