// Upstream response -> client response
use axum::{body::Body, http::StatusCode, response::Response};
use futures::TryStreamExt;

use crate::proxy::config::ProxyConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::mappers::headers::{apply_response_headers, relay_upstream_headers};

/// Decide whether an upstream status is relayed or replaced by an error page
pub fn check_status(status: StatusCode, reason_phrase: Option<&str>) -> Result<(), ProxyError> {
    if status.is_success() || status.is_redirection() {
        Ok(())
    } else {
        Err(ProxyError::from_upstream(status, reason_phrase))
    }
}

/// Reason phrase hyper recorded when the upstream sent a non-canonical one
fn upstream_reason_phrase(upstream: &reqwest::Response) -> Option<&str> {
    upstream
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
}

/// Stream a successful upstream response back with the rewritten header set.
/// Error statuses discard the upstream body entirely.
pub fn transform_response(
    upstream: reqwest::Response,
    config: &ProxyConfig,
) -> Result<Response, ProxyError> {
    let status = upstream.status();
    check_status(status, upstream_reason_phrase(&upstream))?;

    let mut headers = relay_upstream_headers(upstream.headers());
    apply_response_headers(&mut headers, config);

    let stream = upstream.bytes_stream().inspect_err(|e| {
        tracing::warn!("Upstream body stream failed: {}", e);
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
