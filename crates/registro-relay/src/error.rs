//! Error types for the registration relay.

use crate::api::RelayResult;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

/// Caller-facing message for every internal or upstream failure.
pub const PROCESSING_FAILED: &str = "Error al procesar el registro";

/// Relay error types.
///
/// Client errors render their own message; internal errors render
/// [`PROCESSING_FAILED`] and carry their display text in the `error` field.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Método no permitido. Use POST.")]
    MethodNotAllowed,

    #[error("JSON inválido en el body")]
    InvalidJson,

    #[error("Faltan campos requeridos: nombre, email y whatsapp son obligatorios")]
    MissingFields,

    #[error("Formato de email inválido")]
    InvalidEmail,

    #[error("GOOGLE_SCRIPT_URL no configurada en las variables de entorno")]
    MissingConfiguration,

    #[error("Respuesta inválida de Google Apps Script")]
    InvalidUpstreamResponse,

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Transport(String),
}

impl RelayError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::InvalidJson | RelayError::MissingFields | RelayError::InvalidEmail => {
                StatusCode::BAD_REQUEST
            }
            RelayError::MissingConfiguration
            | RelayError::InvalidUpstreamResponse
            | RelayError::Upstream(_)
            | RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure happened on our side or upstream rather than in the request.
    pub fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = if self.is_internal() {
            error!(error = %self, "Registration processing failed");
            RelayResult::failure_with_detail(PROCESSING_FAILED, self.to_string())
        } else {
            RelayResult::failure(self.to_string())
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        // The script URL embeds the deployment id; keep it out of responses.
        RelayError::Transport(e.without_url().to_string())
    }
}
