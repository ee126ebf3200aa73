//! Request metadata captured from inbound headers.

use axum::http::HeaderMap;

/// Placeholder for metadata the request did not carry.
pub const UNKNOWN: &str = "Unknown";

const IP_HEADERS: &[&str] = &["x-forwarded-for", "client-ip"];
const USER_AGENT_HEADERS: &[&str] = &["user-agent"];
const ORIGIN_HEADERS: &[&str] = &["origin", "referer"];

/// Server-observed details about the submitting client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    pub ip: String,
    pub user_agent: String,
    pub origen: String,
}

impl RequestMetadata {
    /// Extract metadata from request headers. Never fails; missing values
    /// become [`UNKNOWN`].
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            ip: first_header(headers, IP_HEADERS),
            user_agent: first_header(headers, USER_AGENT_HEADERS),
            origen: first_header(headers, ORIGIN_HEADERS),
        }
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::from_headers(&HeaderMap::new())
    }
}

/// First non-empty value among `names`. `HeaderMap` lookups are case-insensitive.
fn first_header(headers: &HeaderMap, names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
