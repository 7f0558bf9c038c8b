//! HTTP request validation and construction.
//!
//! This module turns the caller's loosely typed inputs (method text, header
//! JSON, raw body bytes) into a validated request. Every check here runs
//! before any network I/O.

use std::collections::HashMap;

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, TRANSFER_ENCODING};
use reqwest::StatusCode;
use strum_macros::EnumIter as EnumIterMacro;
use url::{form_urlencoded, Url};

use crate::config::{
    ExecutorConfig, FORM_URLENCODED, HEADER_CONTENT_TYPE, HEADER_USER_AGENT, SENSITIVE_HEADERS,
};
use crate::error_handling::ExecutorError;

/// HTTP methods the executor will send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Parses caller-supplied method text.
    ///
    /// The text is upper-cased first, so `"post"` is accepted. Every other
    /// method, including PUT, DELETE, PATCH and HEAD, is rejected.
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::InvalidMethod` carrying the upper-cased text.
    pub fn parse(raw: &str) -> Result<Self, ExecutorError> {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(ExecutorError::InvalidMethod(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }

    pub(crate) fn as_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// One call's inputs, exactly as the caller supplied them.
///
/// # Examples
///
/// ```
/// use nethttp_bridge::RequestSpec;
///
/// let spec = RequestSpec::new("POST", "https://example.com/login")
///     .headers_json(r#"{"User-Agent": "demo/1.0"}"#)
///     .body("user=a&pass=b")
///     .proxy("http://127.0.0.1:8080")
///     .disable_redirects(true);
/// assert_eq!(spec.proxy_url, "http://127.0.0.1:8080");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    /// Method text; validated against the GET/POST whitelist
    pub method: String,
    /// Absolute http(s) target URL
    pub url: String,
    /// Flat JSON object of header name to value
    pub headers_json: String,
    /// Raw request body
    pub body: Vec<u8>,
    /// Proxy URL; empty for a direct connection
    pub proxy_url: String,
    /// Return the first redirect response instead of following it
    pub disable_redirects: bool,
}

impl RequestSpec {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers_json: "{}".to_string(),
            ..Default::default()
        }
    }

    pub fn headers_json(mut self, headers_json: impl Into<String>) -> Self {
        self.headers_json = headers_json.into();
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = proxy_url.into();
        self
    }

    pub fn disable_redirects(mut self, disable: bool) -> Self {
        self.disable_redirects = disable;
        self
    }
}

/// A validated request, ready to send (and to re-send along a redirect chain).
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl PreparedRequest {
    /// Attaches this request to a `reqwest::RequestBuilder`.
    ///
    /// An empty GET carries no body at all, so no `Content-Length: 0` is sent.
    pub(crate) fn to_request_builder(&self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        let builder = client
            .request(self.method.as_reqwest(), self.url.clone())
            .headers(self.headers.clone());
        if self.body.is_empty() && self.method == HttpMethod::Get {
            builder
        } else {
            builder.body(self.body.clone())
        }
    }

    /// Rewrites this request to follow a redirect to `next`.
    ///
    /// 301, 302 and 303 switch to GET and drop the body along with the
    /// headers describing it; 307 and 308 resend method and body unchanged.
    /// Credential headers never cross to a different origin.
    pub(crate) fn redirected(mut self, status: StatusCode, next: Url) -> Self {
        if matches!(status.as_u16(), 301..=303) {
            self.method = HttpMethod::Get;
            self.body.clear();
            self.headers.remove(reqwest::header::CONTENT_TYPE);
            self.headers.remove(reqwest::header::CONTENT_ENCODING);
            self.headers.remove(CONTENT_LENGTH);
        }
        if next.origin() != self.url.origin() {
            for name in SENSITIVE_HEADERS {
                if self.headers.remove(*name).is_some() {
                    debug!("Dropped {name} header on cross-origin redirect to {next}");
                }
            }
        }
        self.url = next;
        self
    }
}

/// Validates the caller's inputs and builds the outbound request.
///
/// Checks run in this order, and the first failure is returned:
/// method, header JSON, identification header, body size, target URL,
/// header name/value syntax.
///
/// # Errors
///
/// Returns the `ExecutorError` variant for the first failed check.
pub fn prepare_request(
    spec: &RequestSpec,
    config: &ExecutorConfig,
) -> Result<PreparedRequest, ExecutorError> {
    let method = HttpMethod::parse(&spec.method)?;
    let mut raw_headers = parse_header_json(&spec.headers_json)?;
    require_identification(&raw_headers)?;

    if spec.body.len() > config.max_request_body_bytes {
        return Err(ExecutorError::BodySizeExceeded {
            size: spec.body.len(),
            limit: config.max_request_body_bytes,
        });
    }

    let url = parse_target_url(&spec.url)?;

    if config.strip_sensitive_headers {
        raw_headers.retain(|name, _| {
            let sensitive = SENSITIVE_HEADERS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(name));
            if sensitive {
                debug!("Stripping sensitive header {name}");
            }
            !sensitive
        });
    }

    let body = if is_form_urlencoded(&raw_headers) {
        normalize_form_body(&spec.body)
    } else {
        spec.body.clone()
    };

    let headers = build_header_map(&raw_headers)?;

    Ok(PreparedRequest {
        method,
        url,
        headers,
        body,
    })
}

/// Parses the header payload as a flat string-to-string JSON object.
///
/// # Errors
///
/// Returns `ExecutorError::HeaderParse` for malformed JSON, a non-object
/// payload, or any non-string value.
pub fn parse_header_json(headers_json: &str) -> Result<HashMap<String, String>, ExecutorError> {
    serde_json::from_str(headers_json).map_err(|e| ExecutorError::HeaderParse(e.to_string()))
}

/// Ensures the identification header is present and not blank.
///
/// Header names are matched case-insensitively.
fn require_identification(headers: &HashMap<String, String>) -> Result<(), ExecutorError> {
    let present = headers
        .iter()
        .any(|(name, value)| name.eq_ignore_ascii_case(HEADER_USER_AGENT) && !value.trim().is_empty());
    if present {
        Ok(())
    } else {
        Err(ExecutorError::MissingIdentification)
    }
}

fn parse_target_url(raw: &str) -> Result<Url, ExecutorError> {
    let reject = |reason: String| ExecutorError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| reject(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(reject(format!(
                "unsupported scheme '{scheme}' (only http and https allowed)"
            )))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(reject("missing host".to_string()));
    }
    Ok(url)
}

/// True when the headers declare an `application/x-www-form-urlencoded` body.
///
/// The media type is compared case-insensitively and parameters such as
/// `charset` are ignored.
pub fn is_form_urlencoded(headers: &HashMap<String, String>) -> bool {
    headers.iter().any(|(name, value)| {
        name.eq_ignore_ascii_case(HEADER_CONTENT_TYPE)
            && value
                .split(';')
                .next()
                .is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_URLENCODED))
    })
}

/// Re-encodes a form body canonically.
///
/// The body is decoded as a query string (a leading `?` is tolerated, bad
/// escapes are decoded leniently) and serialized again with pairs sorted by
/// key. Pairs sharing a key keep their relative order.
pub fn normalize_form_body(raw: &[u8]) -> Vec<u8> {
    let raw = raw.strip_prefix(b"?").unwrap_or(raw);
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(raw)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
        .into_bytes()
}

/// Converts the caller mapping into a `HeaderMap`.
///
/// `Content-Length` and `Transfer-Encoding` are dropped: the body framing is
/// always computed from the body actually sent.
fn build_header_map(raw: &HashMap<String, String>) -> Result<HeaderMap, ExecutorError> {
    let mut headers = HeaderMap::with_capacity(raw.len());
    for (name, value) in raw {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ExecutorError::HeaderParse(format!("invalid header name {name:?}")))?;
        if header_name == CONTENT_LENGTH || header_name == TRANSFER_ENCODING {
            debug!("Ignoring caller-supplied {header_name} header");
            continue;
        }
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            ExecutorError::HeaderParse(format!("invalid value for header {name:?}"))
        })?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}
