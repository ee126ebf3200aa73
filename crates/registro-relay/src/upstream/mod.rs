//! Google Apps Script intake endpoint.

mod client;

pub use client::{ScriptClient, UPSTREAM_FAILED};
