//! HTTP redirect chain handling.
//!
//! The client is built with reqwest's own redirect handling turned off, so
//! this module follows chains manually. That lets the executor record every
//! URL in the chain and apply the caller's redirect policy at each hop.

use log::{debug, warn};
use reqwest::StatusCode;
use url::Url;

use super::request::PreparedRequest;
use crate::error_handling::{network_error, ExecutorError};

/// Decision function applied to every redirect response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Treat any redirect as terminal and return it.
    Deny,
    /// Follow redirects while fewer than `n` requests have been made.
    Bounded(usize),
}

/// What to do with a redirect response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectAction {
    /// Issue the next request in the chain.
    Follow,
    /// Return the redirect response itself.
    Stop,
}

impl RedirectPolicy {
    /// Builds the policy from the caller's "disable redirects" flag.
    pub fn from_flag(disable_redirects: bool, max_hops: usize) -> Self {
        if disable_redirects {
            RedirectPolicy::Deny
        } else {
            RedirectPolicy::Bounded(max_hops)
        }
    }

    /// Decides whether to follow a redirect.
    ///
    /// # Arguments
    ///
    /// * `via` - Number of requests already made in this chain (at least 1)
    ///
    /// # Errors
    ///
    /// Returns `ExecutorError::RedirectExceeded` once `via` reaches the bound.
    pub fn check(&self, via: usize) -> Result<RedirectAction, ExecutorError> {
        match *self {
            RedirectPolicy::Deny => Ok(RedirectAction::Stop),
            RedirectPolicy::Bounded(max) if via >= max => Err(ExecutorError::RedirectExceeded(max)),
            RedirectPolicy::Bounded(_) => Ok(RedirectAction::Follow),
        }
    }
}

/// True for the status codes that carry a followable `Location`.
pub fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Sends `request`, following redirects as `policy` allows.
///
/// # Returns
///
/// The final response and every URL requested, oldest first. The final
/// response's URL is the last element.
///
/// # Errors
///
/// Returns `ExecutorError::Network` when a request in the chain cannot be
/// sent, or `ExecutorError::RedirectExceeded` from the policy.
pub(crate) async fn send_following_redirects(
    client: &reqwest::Client,
    request: PreparedRequest,
    policy: RedirectPolicy,
) -> Result<(reqwest::Response, Vec<Url>), ExecutorError> {
    let mut chain: Vec<Url> = Vec::new();
    let mut current = request;

    loop {
        chain.push(current.url.clone());
        debug!("{} {}", current.method.as_str(), current.url);
        let response = current
            .to_request_builder(client)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !is_redirect(status) {
            return Ok((response, chain));
        }

        let Some(location) = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|loc| loc.to_str().ok())
        else {
            warn!(
                "Redirect status {} for {} but no usable Location header",
                status.as_u16(),
                current.url
            );
            return Ok((response, chain));
        };

        let next = match current.url.join(location) {
            Ok(next) => next,
            Err(e) => {
                warn!("Unresolvable Location {location:?} from {}: {e}", current.url);
                return Ok((response, chain));
            }
        };

        match policy.check(chain.len())? {
            RedirectAction::Stop => {
                debug!("Redirects disabled, returning {} from {}", status, current.url);
                return Ok((response, chain));
            }
            RedirectAction::Follow => {
                debug!("Following {} redirect to {next}", status.as_u16());
            }
        }

        // Release the connection before the next hop
        drop(response);
        current = current.redirected(status, next);
    }
}
