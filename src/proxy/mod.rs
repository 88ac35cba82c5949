// proxy module - raw file reverse proxy service

pub mod config;
pub mod error;
pub mod route;
pub mod server;
pub mod token_resolver;

pub mod handlers; // Route handlers
pub mod mappers; // Response rewriting
pub mod middleware; // Axum middleware
pub mod upstream; // Upstream client

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use server::{build_router, AppState, AxumServer};
