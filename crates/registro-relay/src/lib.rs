//! Registro Relay - registration form intake endpoint.
//!
//! This relay sits between a storefront registration form and a Google Apps
//! Script web app to:
//! - Validate the submitted contact fields
//! - Enrich the submission with request metadata (IP, user agent, origin, date)
//! - Forward it to the spreadsheet-backed script and relay the outcome

pub mod api;
pub mod config;
pub mod error;
pub mod registro;
pub mod upstream;

pub use config::Config;
pub use error::RelayError;
pub use registro::{EnrichedPayload, InboundPayload, RequestMetadata};
pub use upstream::ScriptClient;
