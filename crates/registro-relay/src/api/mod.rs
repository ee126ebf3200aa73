//! HTTP API for the registration relay.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{cors_middleware, logging_middleware, CORS_HEADERS};
pub use types::*;

use crate::upstream::ScriptClient;
use axum::{
    middleware as axum_middleware,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Path the relay is always reachable at.
pub const ROOT_PATH: &str = "/";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Apps Script client (carries the configured destination URL)
    pub script_client: Arc<ScriptClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(script_client: ScriptClient) -> Self {
        Self {
            script_client: Arc::new(script_client),
        }
    }
}

/// Create the API router with the relay at `/` only.
pub fn create_router(state: AppState) -> Router {
    create_router_with_path(state, ROOT_PATH)
}

/// Create the API router with the relay at `/` and at `relay_path`.
pub fn create_router_with_path(state: AppState, relay_path: &str) -> Router {
    let relay_path = normalize_path(relay_path);

    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Relay (method dispatch happens in the handler)
        .route(ROOT_PATH, any(handlers::submit_registro));

    if relay_path != ROOT_PATH && relay_path != "/health" {
        router = router.route(&relay_path, any(handlers::submit_registro));
    }

    router
        .layer(axum_middleware::from_fn(cors_middleware))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
