use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_LOG_DIR: &str = "LOG_DIR";

/// Resolve and create the optional log directory
pub fn get_log_dir(raw: Option<String>) -> Result<Option<PathBuf>, String> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    let log_dir = PathBuf::from(raw.trim());

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)
            .map_err(|e| format!("Failed to create log directory: {}", e))?;
    }

    Ok(Some(log_dir))
}

/// Initialize logger system
///
/// Console output always; a daily rolling file as well when `LOG_DIR` is set.
pub fn init_logger() {
    // Capture log macro logs
    let _ = tracing_log::LogTracer::init();

    let log_dir = match get_log_dir(std::env::var(ENV_LOG_DIR).ok()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to initialize log directory: {}", e);
            None
        }
    };

    // 1. Console output layer
    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    // 2. File output layer (disable ANSI formatting)
    let file_layer = log_dir.as_ref().map(|dir| {
        let file_appender = tracing_appender::rolling::daily(dir, "proxy.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // Leak the guard so the writer lives until process exit
        std::mem::forget(guard);

        fmt::Layer::new()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
    });

    // 3. Set filter layer (default to INFO and above)
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 4. Initialize global subscriber (use try_init to avoid crash on re-initialization)
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    match log_dir {
        Some(dir) => info!("Logger system initialized (Console + File in {:?})", dir),
        None => info!("Logger system initialized (Console)"),
    }
}
