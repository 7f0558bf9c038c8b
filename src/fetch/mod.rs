//! Single-call request execution.
//!
//! Runs one call through the pipeline:
//! request validation → transport selection → redirect policy →
//! send and follow → bounded response capture.
//!
//! Any stage can fail; the failure is returned as a tagged `ExecutorError`
//! and nothing is retried.

pub mod redirects;
pub mod request;
pub mod response;

use log::{debug, warn};

use crate::config::ExecutorConfig;
use crate::envelope::ResultEnvelope;
use crate::error_handling::ExecutorError;
use crate::initialization::{init_client, Transport};
use redirects::{send_following_redirects, RedirectPolicy};
use request::{prepare_request, RequestSpec};
use response::{capture_response, ResponseSnapshot};

/// Executes one request and captures the response.
///
/// Validation failures are returned before any connection is opened. The
/// client is built for this call only and dropped when it returns.
///
/// # Errors
///
/// Returns the `ExecutorError` of the first stage that failed.
///
/// # Example
///
/// ```no_run
/// use nethttp_bridge::{execute, ExecutorConfig, RequestSpec};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let spec = RequestSpec::new("GET", "https://example.com/")
///     .headers_json(r#"{"User-Agent": "demo/1.0"}"#);
/// let snapshot = execute(&spec, &ExecutorConfig::default()).await?;
/// println!("{} ({} bytes)", snapshot.status, snapshot.body_size);
/// # Ok(())
/// # }
/// ```
pub async fn execute(
    spec: &RequestSpec,
    config: &ExecutorConfig,
) -> Result<ResponseSnapshot, ExecutorError> {
    let request = prepare_request(spec, config)?;
    let transport = Transport::select(&spec.proxy_url)?;
    let client = init_client(&transport, config)?;
    let policy = RedirectPolicy::from_flag(spec.disable_redirects, config.max_redirects);

    debug!(
        "Executing {} {} via {} ({:?})",
        request.method.as_str(),
        request.url,
        transport,
        policy
    );

    let (response, chain) = send_following_redirects(&client, request, policy).await?;
    capture_response(response, chain, config.max_response_body_bytes).await
}

/// Executes one request and wraps the outcome in a [`ResultEnvelope`].
///
/// Never fails: every error is folded into the envelope.
pub async fn execute_envelope(spec: &RequestSpec, config: &ExecutorConfig) -> ResultEnvelope {
    let outcome = execute(spec, config).await;
    if let Err(e) = &outcome {
        if e.is_validation() {
            debug!("Rejected {} {}: {} [{}]", spec.method, spec.url, e, e.code());
        } else {
            warn!("{} {} failed: {} [{}]", spec.method, spec.url, e, e.code());
        }
    }
    ResultEnvelope::from(outcome)
}
