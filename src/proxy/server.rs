use crate::error::{AppError, AppResult};
use crate::proxy::config::ProxyConfig;
use crate::proxy::upstream::client::UpstreamClient;
use axum::{
    extract::Request,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state
///
/// Read-only and shared by every request; nothing in here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Self {
        let upstream = UpstreamClient::new(Some(&config.upstream_proxy));
        Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        }
    }
}

/// Build the router. Everything except the health probe goes through one dispatcher.
pub fn build_router(state: AppState) -> Router {
    use crate::proxy::handlers;

    Router::new()
        .route(
            "/healthz",
            get(health_check_handler).options(handlers::handle_request),
        )
        .fallback(handlers::handle_request)
        .layer(axum::middleware::from_fn(
            crate::proxy::middleware::logging_middleware,
        ))
        // Span carries the path only; the query string may hold a token.
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::debug_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        config: ProxyConfig,
    ) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        let addr = format!("{}:{}", config.get_bind_address(), config.port);
        let app = build_router(AppState::new(config));

        // Bind address
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| AppError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Reverse proxy server started at http://{}", local_addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
            local_addr,
        };

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                // Dropping the connection future on client disconnect
                                // also drops any in-flight upstream request.
                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Reverse proxy server stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    Json(serde_json::json!({
        "status": "ok"
    }))
    .into_response()
}
