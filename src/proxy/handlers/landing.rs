// Landing page handler
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::Response,
};

use crate::proxy::config::ProxyConfig;
use crate::proxy::error::PATH_FORMAT;
use crate::proxy::mappers::apply_response_headers;

const EXAMPLE_PATH: &str = "/your-repo/main/README.md";

/// First value of a possibly comma-separated header
fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Origin the client used to reach us, honouring reverse-proxy headers
pub fn request_origin(headers: &HeaderMap) -> String {
    let scheme = first_header_value(headers, "x-forwarded-proto").unwrap_or("http");
    let host = first_header_value(headers, "x-forwarded-host")
        .or_else(|| first_header_value(headers, header::HOST.as_str()))
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the usage page
pub fn render_landing(origin: &str, config: &ProxyConfig) -> String {
    let origin = escape_html(origin);
    let owner = config
        .owner
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "(not configured)".to_string());
    let query_rule = if config.allow_query_param_token {
        "URL query parameter <code>?token=...</code> (enabled on this server)"
    } else {
        "URL query parameter <code>?token=...</code> (disabled on this server)"
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>GitHub Raw Proxy</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 760px; margin: 40px auto; padding: 0 16px; line-height: 1.6; color: #24292f; }}
code {{ background: #f6f8fa; padding: 2px 6px; border-radius: 4px; }}
pre {{ background: #f6f8fa; padding: 12px; border-radius: 6px; overflow-x: auto; }}
</style>
</head>
<body>
<h1>GitHub Raw Proxy</h1>
<p>Serves files from repositories owned by <strong>{owner}</strong>.</p>
<h2>Usage</h2>
<pre>{origin}{format}</pre>
<p>Example:</p>
<pre>{origin}{example}</pre>
<h2>Authentication</h2>
<p>Private repositories need a token. The first one found is used:</p>
<ol>
<li>Request header <code>X-GitHub-Token: &lt;token&gt;</code></li>
<li>{query_rule}</li>
<li>The token configured on the server</li>
</ol>
<p>Without a token only public files can be fetched.</p>
</body>
</html>
"#,
        owner = owner,
        origin = origin,
        format = escape_html(PATH_FORMAT),
        example = EXAMPLE_PATH,
        query_rule = query_rule,
    )
}

pub fn handle_landing(method: &Method, request_headers: &HeaderMap, config: &ProxyConfig) -> Response {
    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        Body::from(render_landing(&request_origin(request_headers), config))
    };

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html;charset=UTF-8"),
    );
    apply_response_headers(headers, config);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_origin() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_origin(&headers), "http://localhost");

        headers.insert(header::HOST, HeaderValue::from_static("proxy.local:8045"));
        assert_eq!(request_origin(&headers), "http://proxy.local:8045");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("raw.example.com"));
        assert_eq!(request_origin(&headers), "https://raw.example.com");
    }

    #[test]
    fn test_render_landing() {
        let config = ProxyConfig {
            owner: Some("octocat".to_string()),
            ..ProxyConfig::default()
        };
        let html = render_landing("https://raw.example.com", &config);
        assert!(html.contains("https://raw.example.com/your-repo/main/README.md"));
        assert!(html.contains("https://raw.example.com/&lt;repo&gt;/&lt;branch&gt;/&lt;path/to/file&gt;"));
        assert!(html.contains("octocat"));
        assert!(html.contains("X-GitHub-Token"));
        assert!(html.contains("disabled on this server"));
    }

    #[test]
    fn test_render_landing_escapes_origin() {
        let html = render_landing("http://<script>", &ProxyConfig::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("(not configured)"));
    }

    #[test]
    fn test_landing_headers() {
        let response = handle_landing(&Method::GET, &HeaderMap::new(), &ProxyConfig::default());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html;charset=UTF-8");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=86400");
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_landing_head_has_headers_only() {
        let config = ProxyConfig {
            owner: Some("octocat".to_string()),
            ..ProxyConfig::default()
        };
        let mut request_headers = HeaderMap::new();
        request_headers.insert(header::HOST, HeaderValue::from_static("proxy.local:8045"));

        let response = handle_landing(&Method::HEAD, &request_headers, &config);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html;charset=UTF-8");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=86400");
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
}
