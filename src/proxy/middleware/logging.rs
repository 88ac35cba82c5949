// Request logging middleware
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Log method, path and outcome of every request.
///
/// Only the path is logged: the query string may carry a token.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();
    if status.is_server_error() {
        tracing::warn!("{} {} -> {} ({} ms)", method, path, status.as_u16(), elapsed_ms);
    } else {
        tracing::info!("{} {} -> {} ({} ms)", method, path, status.as_u16(), elapsed_ms);
    }

    response
}
