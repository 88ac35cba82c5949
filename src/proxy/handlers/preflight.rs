// CORS preflight handler
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};

use crate::proxy::config::ProxyConfig;
use crate::proxy::mappers::apply_response_headers;
use crate::proxy::mappers::headers::DEFAULT_ALLOWED_HEADERS;

/// Body-less 200 with the full header set and an `Access-Control-Allow-Headers`
/// that echoes the browser's request, or the default list.
pub fn handle_preflight(request_headers: &HeaderMap, config: &ProxyConfig) -> Response {
    let allow_headers = request_headers
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    apply_response_headers(headers, config);
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_default_allow_headers() {
        let response = handle_preflight(&HeaderMap::new(), &ProxyConfig::default());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "X-GitHub-Token, Content-Type"
        );
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=86400");
    }

    #[test]
    fn test_preflight_echoes_request_headers() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("x-github-token, if-none-match"),
        );
        let response = handle_preflight(&request_headers, &ProxyConfig::default());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "x-github-token, if-none-match"
        );
    }
}
