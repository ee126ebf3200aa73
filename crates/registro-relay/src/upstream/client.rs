//! HTTP client that forwards registrations to the Apps Script web app.

use crate::error::RelayError;
use crate::registro::EnrichedPayload;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Failure detail when the script rejects a registration without a message.
pub const UPSTREAM_FAILED: &str = "Error al guardar en Google Sheets";

/// Client for the spreadsheet-backed intake script.
///
/// The script URL is optional so a misconfigured deployment still answers
/// requests (with a 500) instead of refusing to start.
#[derive(Clone)]
pub struct ScriptClient {
    client: Client,
    script_url: Option<SecretString>,
}

impl ScriptClient {
    /// Create a new script client.
    ///
    /// No request timeout is set; redirects are followed (Apps Script
    /// answers POSTs with a redirect to the result).
    pub fn new(script_url: Option<String>) -> Result<Self, RelayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| RelayError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let script_url = script_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .map(SecretString::new);

        Ok(Self { client, script_url })
    }

    /// Whether a destination URL is configured.
    pub fn is_configured(&self) -> bool {
        self.script_url.is_some()
    }

    /// Fail with [`RelayError::MissingConfiguration`] when no URL is set.
    pub fn ensure_configured(&self) -> Result<&SecretString, RelayError> {
        self.script_url
            .as_ref()
            .ok_or(RelayError::MissingConfiguration)
    }

    /// POST a registration to the script and interpret its reply.
    ///
    /// The body is read as text before parsing so that HTML error pages
    /// surface as [`RelayError::InvalidUpstreamResponse`].
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn forward(&self, payload: &EnrichedPayload) -> Result<(), RelayError> {
        let url = self.ensure_configured()?;

        debug!("Forwarding registration to Apps Script");

        let response = self
            .client
            .post(url.expose_secret())
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        debug!(status = %status, body = %text, "Apps Script response received");

        let result: Value = serde_json::from_str(&text).map_err(|e| {
            warn!(status = %status, error = %e, "Apps Script returned non-JSON body");
            RelayError::InvalidUpstreamResponse
        })?;

        if !status.is_success() || !is_truthy(result.get("success")) {
            let message = result
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(UPSTREAM_FAILED);

            warn!(status = %status, message = %message, "Apps Script rejected registration");
            return Err(RelayError::Upstream(message.to_string()));
        }

        Ok(())
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are false.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
