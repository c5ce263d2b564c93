//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

/// Body of `POST /departures/next`.
#[derive(Debug, Deserialize)]
pub struct NextDeparturesRequest {
    /// Origin stop name (free text)
    pub origin: String,

    /// Route or stop name (free text)
    pub destination: String,

    /// ISO-8601 timestamp; absent means now
    #[serde(default)]
    pub when_iso: Option<String>,
}

/// Response for `GET /`.
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub agency: String,
    /// Whether schedule data is loaded
    pub schedule_loaded: bool,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Server local time, RFC 3339
    pub timestamp: String,
}

/// Response for `POST /admin/reload`.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// Stops in the new snapshot
    pub stops: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
