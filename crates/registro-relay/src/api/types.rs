//! API response types.

use serde::Serialize;

/// Caller-facing outcome of a relay request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayResult {
    pub success: bool,
    pub message: String,

    /// Processing time of the registration (success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Failure detail (internal errors only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResult {
    pub const SAVED: &'static str = "Registro guardado exitosamente";

    /// Registration stored upstream.
    pub fn saved(timestamp: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Self::SAVED.to_string(),
            timestamp: Some(timestamp.into()),
            error: None,
        }
    }

    /// Failure caused by the request itself.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            timestamp: None,
            error: None,
        }
    }

    /// Internal failure with its underlying reason.
    pub fn failure_with_detail(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::failure(message)
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub upstream_configured: bool,
}
