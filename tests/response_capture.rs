//! Response capture: body ceiling, header multimap, cookies, transport failures.

mod helpers;

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post as post_route},
    Router,
};
use futures::StreamExt;
use nethttp_bridge::{execute, execute_envelope, ErrorCode, ExecutorConfig, RequestSpec};
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{closed_port_url, get_spec, spawn_server, ua_headers_with};

const MIB: usize = 1024 * 1024;

#[tokio::test]
async fn test_simple_get() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .and(header_matcher("user-agent", helpers::TEST_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("server", "mock/1.0")
                .set_body_raw("hello world", "text/plain; charset=utf-8"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let snapshot = execute(
        &get_spec(format!("{}/hello", mock_server.uri())),
        &ExecutorConfig::default(),
    )
    .await
    .expect("request should succeed");

    assert_eq!(snapshot.status, "200 OK");
    assert_eq!(snapshot.status_code, 200);
    assert_eq!(snapshot.protocol, "HTTP/1.1");
    assert_eq!(snapshot.body, "hello world");
    assert_eq!(snapshot.body_size, 11);
    assert_eq!(snapshot.content_length, 11);
    assert!(!snapshot.truncated);
    assert_eq!(snapshot.server, "mock/1.0");
    assert_eq!(snapshot.content_type, "text/plain; charset=utf-8");
    assert_eq!(
        snapshot.headers.get("Content-Type"),
        Some(&vec!["text/plain; charset=utf-8".to_string()])
    );
    assert!(snapshot.cookies.is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_not_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&mock_server)
        .await;

    let envelope = execute_envelope(&get_spec(mock_server.uri()), &ExecutorConfig::default()).await;
    assert!(envelope.success);
    let snapshot = envelope.result.expect("snapshot");
    assert_eq!(snapshot.status_code, 503);
    assert_eq!(snapshot.status, "503 Service Unavailable");
    assert_eq!(snapshot.body, "down");
}

#[tokio::test]
async fn test_large_body_is_truncated_at_the_ceiling() {
    let app = Router::new().route("/big", get(|| async { vec![b'a'; 6 * MIB] }));
    let base = spawn_server(app).await;

    let envelope = execute_envelope(&get_spec(format!("{base}/big")), &ExecutorConfig::default()).await;

    // The serialized envelope is still well-formed
    let value: serde_json::Value = serde_json::from_str(&envelope.to_json()).unwrap();
    assert_eq!(value["success"], true);

    let snapshot = envelope.result.unwrap();
    assert!(snapshot.truncated);
    assert_eq!(snapshot.body_size, 5 * MIB);
    assert_eq!(snapshot.body.len(), 5 * MIB);
    assert_eq!(snapshot.content_length, (6 * MIB) as i64);
}

#[tokio::test]
async fn test_body_exactly_at_the_ceiling_is_not_truncated() {
    let app = Router::new().route("/exact", get(|| async { vec![b'b'; 1024] }));
    let base = spawn_server(app).await;
    let config = ExecutorConfig {
        max_response_body_bytes: 1024,
        ..Default::default()
    };

    let snapshot = execute(&get_spec(format!("{base}/exact")), &config).await.unwrap();
    assert!(!snapshot.truncated);
    assert_eq!(snapshot.body_size, 1024);
}

#[tokio::test]
async fn test_ceiling_inside_a_multibyte_character() {
    let app = Router::new().route("/accents", get(|| async { "é".repeat(1000) }));
    let base = spawn_server(app).await;
    let config = ExecutorConfig {
        max_response_body_bytes: 1001,
        ..Default::default()
    };

    let snapshot = execute(&get_spec(format!("{base}/accents")), &config)
        .await
        .unwrap();
    assert!(snapshot.truncated);
    // Raw bytes: 500 whole characters plus the first byte of the next
    assert_eq!(snapshot.body_size, 1001);
    assert!(snapshot.body.starts_with(&"é".repeat(500)));
    assert!(snapshot.body.ends_with('\u{FFFD}'));
    assert_eq!(snapshot.body.len(), 1000 + '\u{FFFD}'.len_utf8());
}

#[tokio::test]
async fn test_repeated_headers_and_cookies() {
    let app = Router::new().route(
        "/cookies",
        get(|| async {
            (
                AppendHeaders([
                    (header::SET_COOKIE, "session=abc123; Path=/; HttpOnly; Secure"),
                    (header::SET_COOKIE, "theme=dark; Domain=example.com; Max-Age=60"),
                    (header::VARY, "Accept"),
                    (header::VARY, "Accept-Encoding"),
                ]),
                "ok",
            )
        }),
    );
    let base = spawn_server(app).await;

    let snapshot = execute(&get_spec(format!("{base}/cookies")), &ExecutorConfig::default())
        .await
        .unwrap();

    assert_eq!(
        snapshot.headers.get("Vary"),
        Some(&vec!["Accept".to_string(), "Accept-Encoding".to_string()])
    );
    assert_eq!(snapshot.headers.get("Set-Cookie").map(Vec::len), Some(2));

    assert_eq!(snapshot.cookies.len(), 2);
    let session = &snapshot.cookies[0];
    assert_eq!(session.name, "session");
    assert_eq!(session.value, "abc123");
    assert_eq!(session.path, "/");
    assert_eq!(session.domain, "");
    let theme = &snapshot.cookies[1];
    assert_eq!(theme.name, "theme");
    assert_eq!(theme.domain, "example.com");
    assert_eq!(theme.path, "");

    // Only identity fields survive serialization
    let cookie_json = serde_json::to_value(session).unwrap();
    let keys: Vec<&String> = cookie_json.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 4);
}

/// Echoes the request body and content type.
async fn echo_form(headers: HeaderMap, body: Bytes) -> String {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    format!("{content_type}|{}", String::from_utf8_lossy(&body))
}

#[tokio::test]
async fn test_form_body_is_normalized_before_sending() {
    let app = Router::new().route("/form", post_route(echo_form));
    let base = spawn_server(app).await;

    let spec = RequestSpec::new("POST", format!("{base}/form"))
        .headers_json(ua_headers_with(&[(
            "Content-Type",
            "application/x-www-form-urlencoded",
        )]))
        .body("?b=2&a=hello world&a=x%2By");
    let snapshot = execute(&spec, &ExecutorConfig::default()).await.unwrap();
    assert_eq!(
        snapshot.body,
        "application/x-www-form-urlencoded|a=hello+world&a=x%2By&b=2"
    );

    // Other content types are sent byte for byte
    let spec = RequestSpec::new("POST", format!("{base}/form"))
        .headers_json(ua_headers_with(&[("Content-Type", "application/json")]))
        .body(r#"{"b": 2, "a": 1}"#);
    let snapshot = execute(&spec, &ExecutorConfig::default()).await.unwrap();
    assert_eq!(snapshot.body, r#"application/json|{"b": 2, "a": 1}"#);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let envelope = execute_envelope(&get_spec(closed_port_url()), &ExecutorConfig::default()).await;
    assert!(!envelope.success);
    assert_eq!(envelope.code(), Some(ErrorCode::Network));
    assert_eq!(envelope.error_code, Some(5001));
    assert!(envelope.error.unwrap().contains("connect"));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let app = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        }),
    );
    let base = spawn_server(app).await;
    let config = ExecutorConfig {
        timeout_seconds: 1,
        connect_timeout_seconds: 1,
        ..Default::default()
    };

    let started = std::time::Instant::now();
    let envelope = execute_envelope(&get_spec(format!("{base}/slow")), &config).await;
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(envelope.code(), Some(ErrorCode::Network));
    assert!(envelope.error.unwrap().contains("timeout"));
}

#[tokio::test]
async fn test_stalled_body_is_read_error() {
    let app = Router::new().route(
        "/stall",
        get(|| async {
            let chunks = futures::stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(
                b"partial",
            ))])
            .chain(futures::stream::once(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(Bytes::from_static(b"never"))
            }));
            (
                [(header::CONTENT_LENGTH, "100")],
                Body::from_stream(chunks),
            )
                .into_response()
        }),
    );
    let base = spawn_server(app).await;
    let config = ExecutorConfig {
        timeout_seconds: 1,
        connect_timeout_seconds: 1,
        ..Default::default()
    };

    let envelope = execute_envelope(&get_spec(format!("{base}/stall")), &config).await;
    assert_eq!(envelope.code(), Some(ErrorCode::ReadResponse));
    assert_eq!(envelope.error_code, Some(5002));
}
