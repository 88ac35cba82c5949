// Cache, CORS and security headers set on every cacheable response
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

use crate::proxy::config::ProxyConfig;

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";
pub const DEFAULT_ALLOWED_HEADERS: &str = "X-GitHub-Token, Content-Type";
const CORS_MAX_AGE: &str = "86400";

/// Headers that describe one connection and must not be relayed by a proxy
const HOP_BY_HOP_HEADERS: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
];

/// Overwrite the cache/CORS/security header set. Everything else is left untouched.
pub fn apply_response_headers(headers: &mut HeaderMap, config: &ProxyConfig) {
    let cache_control = HeaderValue::from_str(&format!("public, max-age={}", config.cache_time))
        .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=86400"));
    let allow_origin =
        HeaderValue::from_str(&config.cors_origin).unwrap_or_else(|_| HeaderValue::from_static("*"));

    headers.insert(header::CACHE_CONTROL, cache_control);
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(CORS_MAX_AGE),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
}

/// Copy upstream headers, dropping hop-by-hop ones
pub fn relay_upstream_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if !is_hop_by_hop(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}
