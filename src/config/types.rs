//! Configuration types.
//!
//! This module defines the executor configuration and the logging options
//! exposed to hosts.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::config::constants::*;

/// Logging level for the library.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl LogLevel {
    /// Maps the numeric level used across the C ABI (1 = Error .. 5 = Trace).
    ///
    /// Out-of-range values clamp to the nearest level.
    pub fn from_ffi(level: i32) -> Self {
        match level {
            i32::MIN..=1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// A configuration field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what is expected instead
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigValidationError {}

/// Executor configuration.
///
/// Built per call (or cached by the C ABI layer) and never mutated while a
/// request is in flight.
///
/// # Examples
///
/// ```
/// use nethttp_bridge::ExecutorConfig;
///
/// let config = ExecutorConfig {
///     accept_invalid_certs: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Response body ceiling in bytes; anything beyond is discarded
    pub max_response_body_bytes: usize,

    /// Request body ceiling in bytes; larger bodies are rejected before sending
    pub max_request_body_bytes: usize,

    /// Maximum length of a followed redirect chain
    pub max_redirects: usize,

    /// Total per-call timeout in seconds
    pub timeout_seconds: u64,

    /// TCP connect timeout in seconds
    pub connect_timeout_seconds: u64,

    /// Skip TLS certificate verification (opt-in)
    pub accept_invalid_certs: bool,

    /// Remove Authorization, Cookie and Proxy-Authorization before sending
    pub strip_sensitive_headers: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_response_body_bytes: MAX_RESPONSE_BODY_SIZE,
            max_request_body_bytes: MAX_REQUEST_BODY_SIZE,
            max_redirects: MAX_REDIRECT_HOPS,
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            connect_timeout_seconds: TCP_CONNECT_TIMEOUT_SECS,
            accept_invalid_certs: false,
            strip_sensitive_headers: false,
        }
    }
}

impl ExecutorConfig {
    /// Reads overrides from `NETHTTP_*` environment variables.
    ///
    /// Unset variables keep their default. Values that fail to parse are
    /// logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// `from_env` is this function over the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_response_body_bytes: parse_or(
                &lookup,
                ENV_MAX_RESPONSE_BYTES,
                defaults.max_response_body_bytes,
            ),
            max_request_body_bytes: parse_or(
                &lookup,
                ENV_MAX_REQUEST_BYTES,
                defaults.max_request_body_bytes,
            ),
            max_redirects: parse_or(&lookup, ENV_MAX_REDIRECTS, defaults.max_redirects),
            timeout_seconds: parse_or(&lookup, ENV_TIMEOUT_SECS, defaults.timeout_seconds),
            connect_timeout_seconds: parse_or(
                &lookup,
                ENV_CONNECT_TIMEOUT_SECS,
                defaults.connect_timeout_seconds,
            ),
            accept_invalid_certs: flag_or(
                &lookup,
                ENV_ACCEPT_INVALID_CERTS,
                defaults.accept_invalid_certs,
            ),
            strip_sensitive_headers: flag_or(
                &lookup,
                ENV_STRIP_SENSITIVE_HEADERS,
                defaults.strip_sensitive_headers,
            ),
        }
    }

    /// Checks that every limit and timeout is usable.
    ///
    /// # Errors
    ///
    /// Returns the first field that is out of range.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_response_body_bytes == 0 {
            return Err(ConfigValidationError {
                field: "max_response_body_bytes",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.max_request_body_bytes == 0 {
            return Err(ConfigValidationError {
                field: "max_request_body_bytes",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.max_redirects == 0 {
            return Err(ConfigValidationError {
                field: "max_redirects",
                message: "must be greater than 0 (disable redirects per call instead)"
                    .to_string(),
            });
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError {
                field: "timeout_seconds",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.connect_timeout_seconds == 0 {
            return Err(ConfigValidationError {
                field: "connect_timeout_seconds",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.connect_timeout_seconds > self.timeout_seconds {
            return Err(ConfigValidationError {
                field: "connect_timeout_seconds",
                message: format!(
                    "must not exceed timeout_seconds ({})",
                    self.timeout_seconds
                ),
            });
        }
        Ok(())
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub(crate) fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring {key}={raw:?}: not a valid number, using {default}");
            default
        }),
        None => default,
    }
}

fn flag_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" | "" => false,
        _ => {
            warn!("Ignoring {key}={raw:?}: expected true/false, using {default}");
            default
        }
    }
}
