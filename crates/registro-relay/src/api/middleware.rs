//! CORS and logging middleware.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// CORS headers attached to every response, preflight included.
pub const CORS_HEADERS: [(header::HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Accept"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    (header::ACCESS_CONTROL_MAX_AGE, "86400"),
];

/// CORS middleware.
///
/// The form is embedded in a storefront on another origin, so any origin is
/// allowed. Preflight dispatch itself happens in the relay handler.
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }

    response
}

/// Request logging middleware.
///
/// Successful requests log at `debug`, rejected submissions (4xx) at `info`
/// and relay failures (5xx) at `warn`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), elapsed_ms, "Relay request failed");
    } else if status.is_client_error() {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, "Relay request rejected");
    } else {
        debug!(%method, %path, status = status.as_u16(), elapsed_ms, "Relay request handled");
    }

    response
}
