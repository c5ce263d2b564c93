//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::response::QueryResponse;
use crate::timetable::ReloadError;

use super::dto::*;
use super::state::AppState;

const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/", "Server information"),
    ("GET", "/health", "Health check"),
    ("GET", "/tools", "Tool catalogue with input schemas"),
    ("POST", "/departures/next", "Next departures from a stop toward a route or stop"),
    ("GET", "/stops", "List stop names"),
    ("GET", "/routes", "List route names"),
    ("POST", "/admin/reload", "Reload the timetable from disk"),
];

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/tools", get(tools))
        .route("/departures/next", post(next_departures))
        .route("/stops", get(list_stops))
        .route("/routes", get(list_routes))
        .route("/admin/reload", post(reload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Server information.
async fn index(State(state): State<AppState>) -> Json<ServerInfo> {
    let endpoints = ENDPOINTS
        .iter()
        .map(|&(method, path, description)| EndpointInfo {
            method,
            path,
            description,
        })
        .collect();

    Json(ServerInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        agency: state.formatter.agency().to_string(),
        schedule_loaded: state.timetable.current().await.stop_count() > 0,
        endpoints,
    })
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Local::now().to_rfc3339(),
    })
}

/// Tool descriptors for agent clients.
async fn tools(State(state): State<AppState>) -> Json<Value> {
    let agency = state.formatter.agency();
    Json(json!({
        "tools": [
            {
                "name": "next_departures",
                "description": format!("Next {agency} bus departures from a stop toward a route or stop"),
                "input_schema": {
                    "type": "object",
                    "properties": {
                        "origin": {"type": "string"},
                        "destination": {"type": "string"},
                        "when_iso": {"type": "string", "format": "date-time"}
                    },
                    "required": ["origin", "destination"]
                }
            },
            {
                "name": "list_stops",
                "description": format!("List all available {agency} bus stops"),
                "input_schema": {"type": "object", "properties": {}}
            },
            {
                "name": "list_routes",
                "description": format!("List all available {agency} bus routes"),
                "input_schema": {"type": "object", "properties": {}}
            }
        ]
    }))
}

/// Next departures from an origin toward a destination.
async fn next_departures(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QueryResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: NextDeparturesRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(&body), "rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let engine = state.timetable.current().await;
    let outcome = engine.next_departures(&req.origin, &req.destination, req.when_iso.as_deref());

    Ok(Json(state.formatter.departures(&outcome)))
}

/// List stop names.
async fn list_stops(State(state): State<AppState>) -> Json<QueryResponse> {
    let names = state.timetable.current().await.list_stops();
    Json(state.formatter.stops(&names))
}

/// List route names.
async fn list_routes(State(state): State<AppState>) -> Json<QueryResponse> {
    let names = state.timetable.current().await.list_routes();
    Json(state.formatter.routes(&names))
}

/// Reload the timetable from the configured feed directory.
async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let stops = state.timetable.reload().await?;
    info!(stops, "timetable reloaded on request");
    Ok(Json(ReloadResponse { stops }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<ReloadError> for AppError {
    fn from(e: ReloadError) -> Self {
        match e {
            ReloadError::NotConfigured => AppError::Unavailable {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
