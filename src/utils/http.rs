use reqwest::{Client, Proxy};

use crate::proxy::config::UpstreamProxyConfig;

const USER_AGENT: &str = concat!("github-raw-proxy/", env!("CARGO_PKG_VERSION"));

/// Create an HTTP client with the specified proxy configuration
///
/// No request timeout is set; upstream slowness surfaces to the caller as-is.
pub fn create_client_with_proxy(proxy_config: Option<&UpstreamProxyConfig>) -> Client {
    let mut builder = Client::builder().user_agent(USER_AGENT);

    if let Some(config) = proxy_config {
        if config.enabled && !config.url.is_empty() {
            match Proxy::all(&config.url) {
                Ok(proxy) => {
                    builder = builder.proxy(proxy);
                    tracing::info!("HTTP client upstream proxy enabled: {}", config.url);
                }
                Err(e) => {
                    tracing::error!("Invalid proxy address: {}, error: {}", config.url, e);
                }
            }
        }
    }

    builder.build().unwrap_or_else(|e| {
        tracing::error!("Failed to build HTTP client, using defaults: {}", e);
        Client::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_proxy_is_ignored() {
        let config = UpstreamProxyConfig {
            enabled: true,
            url: "not a url".to_string(),
        };
        // Falls back to a direct client instead of failing.
        let _client = create_client_with_proxy(Some(&config));
    }
}
