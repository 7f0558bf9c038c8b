//! HTTP response capture utilities.

use std::collections::BTreeMap;

use log::debug;
use reqwest::header::{HeaderMap, CONTENT_TYPE, DATE, SERVER};
use reqwest::Version;
use url::Url;

use super::types::{CookieRecord, ResponseSnapshot};
use crate::error_handling::ExecutorError;

/// Captures a bounded snapshot of `response`.
///
/// Consumes the response; its body stream is released when this function
/// returns, whether or not the read succeeded.
///
/// # Arguments
///
/// * `response` - The final response of the chain
/// * `chain` - URLs requested, oldest first
/// * `max_body_bytes` - Body ceiling; further bytes are discarded
///
/// # Errors
///
/// Returns `ExecutorError::ReadResponse` if the body stream fails.
pub(crate) async fn capture_response(
    mut response: reqwest::Response,
    chain: Vec<Url>,
    max_body_bytes: usize,
) -> Result<ResponseSnapshot, ExecutorError> {
    let status = response.status();
    let status_line = match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    };
    let protocol = protocol_string(response.version());
    let url = response.url().to_string();
    let content_length = response
        .content_length()
        .map_or(-1, |len| i64::try_from(len).unwrap_or(i64::MAX));

    // Everything borrowed from the response head is copied out before the body is read
    let headers = extract_headers(response.headers());
    let cookies: Vec<CookieRecord> = response.cookies().map(CookieRecord::from).collect();
    let server = first_value(response.headers(), SERVER);
    let content_type = first_value(response.headers(), CONTENT_TYPE);
    let date = first_value(response.headers(), DATE);

    let (body, truncated) = read_bounded_body(&mut response, max_body_bytes).await?;
    drop(response);

    if truncated {
        debug!("Response body from {url} truncated at {max_body_bytes} bytes");
    }
    debug!("{} from {url}: {} body bytes", status_line, body.len());

    Ok(ResponseSnapshot {
        status: status_line,
        status_code: status.as_u16(),
        protocol,
        url,
        headers,
        content_length,
        body_size: body.len(),
        truncated,
        cookies,
        server,
        content_type,
        date,
        body: String::from_utf8_lossy(&body).into_owned(),
        redirects: chain.iter().rev().map(Url::to_string).collect(),
    })
}

/// Reads at most `max_bytes` of the body.
///
/// # Returns
///
/// The captured bytes and whether the body had more data past the ceiling.
async fn read_bounded_body(
    response: &mut reqwest::Response,
    max_bytes: usize,
) -> Result<(Vec<u8>, bool), ExecutorError> {
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0)
        .min(max_bytes);
    let mut body = Vec::with_capacity(capacity);

    while let Some(chunk) = response.chunk().await.map_err(ExecutorError::ReadResponse)? {
        let remaining = max_bytes - body.len();
        if chunk.len() > remaining {
            body.extend_from_slice(&chunk[..remaining]);
            return Ok((body, true));
        }
        body.extend_from_slice(&chunk);
    }
    Ok((body, false))
}

/// Converts response headers to a multimap keyed by canonical header name.
///
/// Every value is kept, in the order received.
pub fn extract_headers(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        out.entry(canonical_header_name(name.as_str()))
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    out
}

/// Canonicalizes a header name: first letter and every letter after a
/// hyphen upper-cased, everything else lower-cased (`content-type` becomes
/// `Content-Type`).
pub fn canonical_header_name(name: &str) -> String {
    let mut upper_next = true;
    name.chars()
        .map(|c| {
            let mapped = if upper_next {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper_next = c == '-';
            mapped
        })
        .collect()
}

fn first_value(headers: &HeaderMap, name: reqwest::header::HeaderName) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

fn protocol_string(version: Version) -> String {
    match version {
        Version::HTTP_09 => "HTTP/0.9".to_string(),
        Version::HTTP_10 => "HTTP/1.0".to_string(),
        Version::HTTP_11 => "HTTP/1.1".to_string(),
        Version::HTTP_2 => "HTTP/2.0".to_string(),
        Version::HTTP_3 => "HTTP/3.0".to_string(),
        other => format!("{other:?}"),
    }
}
