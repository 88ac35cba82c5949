use serde::Serialize;

/// Fixed raw-content host all file requests are forwarded to
pub const RAW_CONTENT_BASE_URL: &str = "https://raw.githubusercontent.com";

pub const ENV_OWNER: &str = "GITHUB_OWNER";
pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_ALLOW_QUERY_PARAM_TOKEN: &str = "ALLOW_QUERY_PARAM_TOKEN";
pub const ENV_CACHE_TIME: &str = "CACHE_TIME";
pub const ENV_CORS_ORIGIN: &str = "CORS_ORIGIN";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ALLOW_LAN_ACCESS: &str = "ALLOW_LAN_ACCESS";
pub const ENV_UPSTREAM_PROXY: &str = "UPSTREAM_PROXY";

const DEFAULT_CACHE_TIME: u64 = 86400;
const DEFAULT_CORS_ORIGIN: &str = "*";
const DEFAULT_PORT: u16 = 8045;

/// Reverse proxy configuration
///
/// Built once at startup and handed to every helper by reference. Nothing
/// below the binary entry point reads the environment.
#[derive(Clone, Serialize)]
pub struct ProxyConfig {
    /// Repository owner every content path is resolved against.
    /// `None` makes content requests fail with a configuration error.
    pub owner: Option<String>,

    /// Server-side fallback token
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Whether `?token=` is honoured (`ALLOW_QUERY_PARAM_TOKEN` must be exactly `"true"`)
    pub allow_query_param_token: bool,

    /// `max-age` for proxied content, in seconds
    pub cache_time: u64,

    /// Value of `Access-Control-Allow-Origin`
    pub cors_origin: String,

    /// Listen port
    pub port: u16,

    /// Whether to listen on all interfaces
    /// - false: 127.0.0.1 only (default)
    /// - true: 0.0.0.0
    pub allow_lan_access: bool,

    /// Outbound proxy for upstream calls
    pub upstream_proxy: UpstreamProxyConfig,

    /// Raw-content host. Only overridden by tests.
    pub upstream_base_url: String,
}

/// Outbound proxy configuration
#[derive(Debug, Clone, Serialize, Default)]
pub struct UpstreamProxyConfig {
    /// Whether it is enabled
    pub enabled: bool,
    /// Proxy address (http://, https://, socks5://)
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            owner: None,
            token: None,
            allow_query_param_token: false,
            cache_time: default_cache_time(),
            cors_origin: default_cors_origin(),
            port: default_port(),
            allow_lan_access: false,
            upstream_proxy: UpstreamProxyConfig::default(),
            upstream_base_url: default_upstream_base_url(),
        }
    }
}

// Token is printed as <redacted>.
impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("owner", &self.owner)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("allow_query_param_token", &self.allow_query_param_token)
            .field("cache_time", &self.cache_time)
            .field("cors_origin", &self.cors_origin)
            .field("port", &self.port)
            .field("allow_lan_access", &self.allow_lan_access)
            .field("upstream_proxy", &self.upstream_proxy)
            .field("upstream_base_url", &self.upstream_base_url)
            .finish()
    }
}

fn default_cache_time() -> u64 {
    DEFAULT_CACHE_TIME
}

fn default_cors_origin() -> String {
    DEFAULT_CORS_ORIGIN.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_upstream_base_url() -> String {
    RAW_CONTENT_BASE_URL.to_string()
}

/// Treat unset and blank the same
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ProxyConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.owner = non_empty(lookup(ENV_OWNER));
        config.token = non_empty(lookup(ENV_TOKEN));
        config.allow_query_param_token =
            lookup(ENV_ALLOW_QUERY_PARAM_TOKEN).as_deref() == Some("true");

        if let Some(raw) = non_empty(lookup(ENV_CACHE_TIME)) {
            match raw.parse::<u64>() {
                Ok(secs) => config.cache_time = secs,
                Err(_) => tracing::warn!(
                    "Invalid {} value {:?}, using default {}",
                    ENV_CACHE_TIME,
                    raw,
                    DEFAULT_CACHE_TIME
                ),
            }
        }

        if let Some(origin) = non_empty(lookup(ENV_CORS_ORIGIN)) {
            if axum::http::HeaderValue::from_str(&origin).is_ok() {
                config.cors_origin = origin;
            } else {
                tracing::warn!(
                    "{} is not a valid header value, using {:?}",
                    ENV_CORS_ORIGIN,
                    DEFAULT_CORS_ORIGIN
                );
            }
        }

        if let Some(raw) = non_empty(lookup(ENV_PORT)) {
            match raw.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!(
                    "Invalid {} value {:?}, using default {}",
                    ENV_PORT,
                    raw,
                    DEFAULT_PORT
                ),
            }
        }

        config.allow_lan_access = lookup(ENV_ALLOW_LAN_ACCESS).as_deref() == Some("true");

        if let Some(url) = non_empty(lookup(ENV_UPSTREAM_PROXY)) {
            config.upstream_proxy = UpstreamProxyConfig { enabled: true, url };
        }

        config
    }

    /// Point the proxy at a different raw-content host
    pub fn with_upstream_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.upstream_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the actual listen address
    /// - allow_lan_access = false: "127.0.0.1"
    /// - allow_lan_access = true: "0.0.0.0"
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ProxyConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProxyConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.owner, None);
        assert_eq!(config.token, None);
        assert!(!config.allow_query_param_token);
        assert_eq!(config.cache_time, 86400);
        assert_eq!(config.cors_origin, "*");
        assert_eq!(config.port, 8045);
        assert_eq!(config.get_bind_address(), "127.0.0.1");
        assert!(!config.upstream_proxy.enabled);
        assert_eq!(config.upstream_base_url, "https://raw.githubusercontent.com");
    }

    #[test]
    fn test_query_param_flag_requires_exact_true() {
        assert!(config_from(&[(ENV_ALLOW_QUERY_PARAM_TOKEN, "true")]).allow_query_param_token);
        for value in ["TRUE", "True", "1", "yes", " true", ""] {
            assert!(
                !config_from(&[(ENV_ALLOW_QUERY_PARAM_TOKEN, value)]).allow_query_param_token,
                "{:?} must not enable query tokens",
                value
            );
        }
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (ENV_OWNER, "octocat"),
            (ENV_TOKEN, "ghp_server"),
            (ENV_CACHE_TIME, "600"),
            (ENV_CORS_ORIGIN, "https://example.com"),
            (ENV_PORT, "9000"),
            (ENV_ALLOW_LAN_ACCESS, "true"),
            (ENV_UPSTREAM_PROXY, "socks5://127.0.0.1:1080"),
        ]);
        assert_eq!(config.owner.as_deref(), Some("octocat"));
        assert_eq!(config.token.as_deref(), Some("ghp_server"));
        assert_eq!(config.cache_time, 600);
        assert_eq!(config.cors_origin, "https://example.com");
        assert_eq!(config.port, 9000);
        assert_eq!(config.get_bind_address(), "0.0.0.0");
        assert!(config.upstream_proxy.enabled);
        assert_eq!(config.upstream_proxy.url, "socks5://127.0.0.1:1080");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            (ENV_OWNER, "   "),
            (ENV_CACHE_TIME, "one day"),
            (ENV_CORS_ORIGIN, "bad\norigin"),
            (ENV_PORT, "99999"),
        ]);
        assert_eq!(config.owner, None);
        assert_eq!(config.cache_time, 86400);
        assert_eq!(config.cors_origin, "*");
        assert_eq!(config.port, 8045);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = config_from(&[(ENV_TOKEN, "ghp_secret_value")]);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("ghp_secret_value"));
        assert!(rendered.contains("<redacted>"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ghp_secret_value"));
    }

    #[test]
    fn test_with_upstream_base_url_trims_slash() {
        let config = ProxyConfig::default().with_upstream_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.upstream_base_url, "http://127.0.0.1:1234");
    }
}
