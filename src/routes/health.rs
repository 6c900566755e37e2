use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    database: String,
}

/// `GET /health` — lightweight liveness probe, no database round trip.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// `GET /api/v1/health` — detailed health check with database connectivity.
async fn api_health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.db.ping().await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Root-level health route.
pub fn root_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// API-level health route.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(api_health_check))
}
