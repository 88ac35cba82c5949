// Handlers module - one per route kind

pub mod content;
pub mod landing;
pub mod preflight;

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};

use crate::proxy::error::ProxyError;
use crate::proxy::route::{classify, Route};
use crate::proxy::server::AppState;

/// Single entry point: classify the request, then hand it to the matching handler
pub async fn handle_request(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    match classify(&method, uri.path()) {
        Route::Preflight => preflight::handle_preflight(&headers, &state.config),
        Route::Landing => landing::handle_landing(&method, &headers, &state.config),
        Route::Content => content::handle_content(&state, &method, &uri, &headers)
            .await
            .unwrap_or_else(IntoResponse::into_response),
        Route::MethodNotAllowed => ProxyError::MethodNotAllowed.into_response(),
    }
}
