pub mod error;
pub mod modules;
pub mod proxy; // Proxy service module
pub mod utils;

use error::AppResult;
use modules::logger;
use proxy::{AxumServer, ProxyConfig};
use tracing::{info, warn};

/// Run the proxy until Ctrl-C
pub async fn run() -> AppResult<()> {
    // Initialize logger
    logger::init_logger();

    let config = ProxyConfig::from_env();
    info!(
        "Loaded configuration: {}",
        serde_json::to_string(&config).unwrap_or_default()
    );
    if config.owner.is_none() {
        warn!(
            "{} is not set, content requests will fail until it is configured",
            proxy::config::ENV_OWNER
        );
    }

    let (server, handle) = AxumServer::start(config).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    server.stop();
    handle.await.ok();
    Ok(())
}
