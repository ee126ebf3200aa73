//! HTTP request handlers.

use super::types::{HealthResponse, RelayResult};
use super::AppState;
use crate::error::RelayError;
use crate::registro::{EnrichedPayload, InboundPayload, RequestMetadata};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{info, warn};

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        upstream_configured: state.script_client.is_configured(),
    })
}

/// Relay a registration form submission to the Apps Script endpoint.
///
/// Accepts every method: `OPTIONS` is answered as a CORS preflight and
/// anything other than `POST` gets a 405. A body that cannot be read
/// (e.g. over the body size limit) is answered like malformed JSON.
pub async fn submit_registro(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, RelayError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    if method != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    state.script_client.ensure_configured()?;

    let body = body.map_err(|rejection| {
        warn!(status = %rejection.status(), "Unreadable registration body");
        RelayError::InvalidJson
    })?;

    let inbound = InboundPayload::from_json(&body).map_err(|e| {
        warn!(error = %e, "Rejected registration body");
        e
    })?;

    inbound.validate().map_err(|e| {
        warn!(email = %inbound.email, "Rejected registration email");
        e
    })?;

    let payload = EnrichedPayload::build(
        inbound,
        RequestMetadata::from_headers(&headers),
        Utc::now(),
    );

    info!(
        email = %payload.email,
        producto = %payload.producto,
        "Registration received"
    );

    state.script_client.forward(&payload).await?;

    info!(email = %payload.email, fecha = %payload.fecha, "Registration saved");

    Ok(Json(RelayResult::saved(payload.fecha)).into_response())
}
