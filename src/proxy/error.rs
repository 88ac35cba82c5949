// Request-level error kinds and their HTTP mapping
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Inbound path shape, quoted in malformed-path errors and on the landing page
pub const PATH_FORMAT: &str = "/<repo>/<branch>/<path/to/file>";

/// Every way a single proxied request can fail.
///
/// All variants are terminal for the request. None of them carries token material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("Server misconfigured: environment variable {variable} is not set")]
    Configuration { variable: &'static str },

    #[error("Invalid path, expected format: {}", PATH_FORMAT)]
    MalformedPath,

    #[error("Method not allowed, use GET, HEAD or OPTIONS")]
    MethodNotAllowed,

    #[error("File not found, check that the repository, branch and path are correct")]
    UpstreamNotFound,

    #[error("Access denied, the token is invalid or lacks permission for this repository")]
    UpstreamUnauthorized,

    #[error("Upstream error: {status} {reason}")]
    UpstreamOther { status: u16, reason: String },

    #[error("Proxy request failed: {0}")]
    Transport(String),
}

impl ProxyError {
    /// Classify a non-OK upstream status
    pub fn from_upstream_status(status: StatusCode) -> Self {
        Self::from_upstream(status, None)
    }

    /// Classify a non-OK upstream status, keeping the upstream's own reason phrase
    /// when it sent one. Otherwise the canonical phrase is used.
    pub fn from_upstream(status: StatusCode, reason_phrase: Option<&str>) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::UpstreamNotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::UpstreamUnauthorized,
            other => Self::UpstreamOther {
                status: other.as_u16(),
                reason: reason_phrase
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .or(other.canonical_reason())
                    .unwrap_or("Unknown")
                    .to_string(),
            },
        }
    }

    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration_error",
            Self::MalformedPath => "invalid_path",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::UpstreamNotFound => "not_found",
            Self::UpstreamUnauthorized => "access_denied",
            Self::UpstreamOther { .. } => "upstream_error",
            Self::Transport(_) => "proxy_error",
        }
    }

    /// Status code and user-facing message for this error
    pub fn status_and_message(&self) -> (StatusCode, String) {
        let status = match self {
            Self::Configuration { .. } | Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MalformedPath => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::UpstreamNotFound => StatusCode::NOT_FOUND,
            Self::UpstreamUnauthorized => StatusCode::FORBIDDEN,
            Self::UpstreamOther { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        };
        (status, self.to_string())
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        // The URL is dropped so the message only describes the failure.
        Self::Transport(err.without_url().to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = Json(json!({
            "error": self.kind(),
            "status": status.as_u16(),
            "message": message,
        }));

        let mut response = (status, body).into_response();
        if matches!(self, Self::MethodNotAllowed) {
            response.headers_mut().insert(
                header::ALLOW,
                HeaderValue::from_static("GET, HEAD, OPTIONS"),
            );
        }
        response
    }
}
