// Content handler: path -> upstream file
use axum::{
    http::{HeaderMap, Method, Uri},
    response::Response,
};
use tracing::{debug, warn};

use crate::proxy::error::ProxyError;
use crate::proxy::mappers::transform_response;
use crate::proxy::route::TargetDescriptor;
use crate::proxy::server::AppState;
use crate::proxy::token_resolver;

/// Resolve the target, pick a token, fetch once and rewrite the result
pub async fn handle_content(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Response, ProxyError> {
    let config = state.config.as_ref();

    // 1. Parse path
    let target = TargetDescriptor::resolve(uri.path(), config)?;
    let url = target.upstream_url(&config.upstream_base_url);

    // 2. Token
    let token = token_resolver::resolve(headers, uri.query(), config);

    debug!(
        repo = %target.repo,
        branch = %target.branch,
        file = %target.file_path,
        token_source = ?token.as_ref().map(|t| t.source),
        "Forwarding {} to upstream",
        method
    );

    // 3. Upstream call
    let response = state
        .upstream
        .fetch(method, &url, headers, token.as_ref())
        .await
        .inspect_err(|e| warn!("Upstream request for {} failed: {}", url, e))?;

    // 4. Response mapping
    transform_response(response, config)
        .inspect_err(|e| warn!("Upstream returned error for {}: {}", url, e))
}
