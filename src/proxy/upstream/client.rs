// Upstream client for the raw-content host
use axum::http::{header, HeaderMap, HeaderValue, Method};
use reqwest::{Client, Response};

use crate::proxy::config::UpstreamProxyConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::token_resolver::ResolvedToken;

/// Inbound request headers relayed upstream. Conditional headers keep 304 working.
const FORWARDED_REQUEST_HEADERS: [header::HeaderName; 3] = [
    header::IF_NONE_MATCH,
    header::IF_MODIFIED_SINCE,
    header::ACCEPT_ENCODING,
];

pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    pub fn new(proxy_config: Option<&UpstreamProxyConfig>) -> Self {
        Self {
            http_client: crate::utils::http::create_client_with_proxy(proxy_config),
        }
    }

    /// Build the outbound header set
    fn build_headers(
        inbound: &HeaderMap,
        token: Option<&ResolvedToken>,
    ) -> Result<HeaderMap, ProxyError> {
        let mut headers = HeaderMap::new();
        for name in FORWARDED_REQUEST_HEADERS {
            if let Some(value) = inbound.get(&name) {
                headers.insert(name, value.clone());
            }
        }

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("token {}", token.value)).map_err(|_| {
                ProxyError::Transport("token contains characters not allowed in a header".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Issue exactly one GET or HEAD, mirroring the inbound method. No retries.
    pub async fn fetch(
        &self,
        method: &Method,
        url: &str,
        inbound_headers: &HeaderMap,
        token: Option<&ResolvedToken>,
    ) -> Result<Response, ProxyError> {
        let headers = Self::build_headers(inbound_headers, token)?;

        let request = if method == Method::HEAD {
            self.http_client.head(url)
        } else {
            self.http_client.get(url)
        };

        let response = request.headers(headers).send().await?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::token_resolver::TokenSource;

    #[test]
    fn test_build_headers_with_token() {
        let token = ResolvedToken {
            value: "abc123".to_string(),
            source: TokenSource::Header,
        };
        let headers = UpstreamClient::build_headers(&HeaderMap::new(), Some(&token)).unwrap();
        let auth = headers.get(header::AUTHORIZATION).unwrap();
        assert_eq!(auth, "token abc123");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn test_build_headers_anonymous() {
        let headers = UpstreamClient::build_headers(&HeaderMap::new(), None).unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_build_headers_forwards_only_allowed() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"etag\""));
        inbound.insert(header::COOKIE, HeaderValue::from_static("session=1"));
        inbound.insert(header::RANGE, HeaderValue::from_static("bytes=0-10"));
        inbound.insert("x-github-token", HeaderValue::from_static("abc"));

        let headers = UpstreamClient::build_headers(&inbound, None).unwrap();
        assert_eq!(headers.get(header::IF_NONE_MATCH).unwrap(), "\"etag\"");
        assert!(headers.get(header::COOKIE).is_none());
        assert!(headers.get(header::RANGE).is_none());
        assert!(headers.get("x-github-token").is_none());
    }

    #[test]
    fn test_build_headers_rejects_bad_token_without_echoing_it() {
        let token = ResolvedToken {
            value: "bad\ntoken".to_string(),
            source: TokenSource::Config,
        };
        let err = UpstreamClient::build_headers(&HeaderMap::new(), Some(&token)).unwrap_err();
        assert!(!err.to_string().contains("bad\ntoken"));
    }
}
