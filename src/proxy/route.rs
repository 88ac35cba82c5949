// Request classification and content-path parsing
use axum::http::Method;

use crate::proxy::config::{ProxyConfig, ENV_OWNER};
use crate::proxy::error::ProxyError;

/// What an inbound request is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Preflight,
    Content,
    MethodNotAllowed,
}

/// Classify a request by method and path. Preflight wins on any path.
pub fn classify(method: &Method, path: &str) -> Route {
    if method == Method::OPTIONS {
        return Route::Preflight;
    }
    if method != Method::GET && method != Method::HEAD {
        return Route::MethodNotAllowed;
    }
    if path.is_empty() || path == "/" {
        Route::Landing
    } else {
        Route::Content
    }
}

/// A file inside the configured owner's repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub file_path: String,
}

/// `.` or `..`, including the percent-encoded forms URL parsers also resolve
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

impl TargetDescriptor {
    /// Parse `/<repo>/<branch>/<path/to/file>` against the configured owner
    pub fn resolve(path: &str, config: &ProxyConfig) -> Result<Self, ProxyError> {
        let owner = config
            .owner
            .clone()
            .ok_or(ProxyError::Configuration { variable: ENV_OWNER })?;

        let mut parts = path.trim_start_matches('/').splitn(3, '/');
        let repo = parts.next().unwrap_or_default();
        let branch = parts.next().unwrap_or_default();
        let file_path = parts.next().unwrap_or_default();

        // The file path must contain at least one real segment.
        if repo.is_empty() || branch.is_empty() || file_path.split('/').all(str::is_empty) {
            return Err(ProxyError::MalformedPath);
        }

        // The URL parser resolves dot segments and treats `\` as `/`, either of
        // which would let a path climb out of the configured owner.
        if path.contains('\\') || path.split('/').any(is_dot_segment) {
            return Err(ProxyError::MalformedPath);
        }

        Ok(Self {
            owner,
            repo: repo.to_string(),
            branch: branch.to_string(),
            file_path: file_path.to_string(),
        })
    }

    /// Fully qualified upstream URL for this file
    pub fn upstream_url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch,
            self.file_path
        )
    }
}
