use thiserror::Error;

/// Process-level failures (startup, binding). Request failures are `ProxyError`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to bind address {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

// Implement alias for Result to simplify usage
pub type AppResult<T> = Result<T, AppError>;
