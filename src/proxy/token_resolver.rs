// Token resolution: header, then query (when enabled), then server config
use axum::http::HeaderMap;

use crate::proxy::config::ProxyConfig;

/// Request header that carries a caller-supplied token
pub const TOKEN_HEADER: &str = "x-github-token";

/// Query parameter that carries a caller-supplied token
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Where the resolved token came from. Safe to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    QueryParam,
    Config,
}

/// A token picked for one request
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub value: String,
    pub source: TokenSource,
}

impl std::fmt::Debug for ResolvedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedToken")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Pick the token for a request. First non-empty source wins; `None` means anonymous.
pub fn resolve(
    headers: &HeaderMap,
    query: Option<&str>,
    config: &ProxyConfig,
) -> Option<ResolvedToken> {
    // 1. Header
    if let Some(value) = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return Some(ResolvedToken {
            value: value.to_string(),
            source: TokenSource::Header,
        });
    }

    // 2. Query parameter, skipped entirely unless enabled
    if config.allow_query_param_token {
        if let Some(value) = query.and_then(query_token) {
            return Some(ResolvedToken {
                value,
                source: TokenSource::QueryParam,
            });
        }
    }

    // 3. Server-side token
    config.token.as_ref().map(|value| ResolvedToken {
        value: value.clone(),
        source: TokenSource::Config,
    })
}

fn query_token(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TOKEN_QUERY_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
