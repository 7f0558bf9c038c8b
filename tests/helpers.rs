// Shared test helpers for local mock servers and request construction.
//
// This module provides common utilities used across multiple test files to reduce duplication.
#![allow(dead_code)] // Each test file uses a different subset

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use nethttp_bridge::RequestSpec;

/// User-Agent sent by every test request that is expected to pass validation.
pub const TEST_USER_AGENT: &str = "nethttp-bridge-tests/1.0";

/// Starts `app` on an ephemeral loopback port and returns its base URL
/// (no trailing slash).
pub async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    });

    // Give server time to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://{addr}")
}

/// Header JSON carrying only the test User-Agent.
pub fn ua_headers() -> String {
    format!(r#"{{"User-Agent": "{TEST_USER_AGENT}"}}"#)
}

/// Header JSON carrying the test User-Agent plus `extra` pairs.
pub fn ua_headers_with(extra: &[(&str, &str)]) -> String {
    let mut map = serde_json::Map::new();
    map.insert("User-Agent".to_string(), TEST_USER_AGENT.into());
    for (name, value) in extra {
        map.insert((*name).to_string(), (*value).into());
    }
    serde_json::Value::Object(map).to_string()
}

/// A GET that passes validation.
pub fn get_spec(url: impl Into<String>) -> RequestSpec {
    RequestSpec::new("GET", url).headers_json(ua_headers())
}

/// A POST that passes validation.
pub fn post_spec(url: impl Into<String>, body: impl Into<Vec<u8>>) -> RequestSpec {
    RequestSpec::new("POST", url)
        .headers_json(ua_headers())
        .body(body)
}

/// A loopback URL on a port nothing listens on.
pub fn closed_port_url() -> String {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    format!("http://127.0.0.1:{port}/")
}
