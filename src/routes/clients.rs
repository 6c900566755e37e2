use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the external clients proxy group: `/external/clients/...`
///
/// These routes pass through to the sibling "clients" service. Upstream
/// failures never surface as faults; they come back as empty lists or
/// `false` outcome flags.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route(
            "/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/external/clients`
async fn list_clients(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.clients.list().await))
}

/// `GET /api/v1/external/clients/{id}`
async fn get_client(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let found = state
        .clients
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Client not found.".to_string()))?;
    Ok(Json(found))
}

/// `POST /api/v1/external/clients`
async fn create_client(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let created = state.clients.create(&body).await;
    Ok(Json(json!({ "created": created })))
}

/// `PUT /api/v1/external/clients/{id}`
async fn update_client(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let updated = state.clients.update(&id, &body).await;
    Ok(Json(json!({ "updated": updated })))
}

/// `DELETE /api/v1/external/clients/{id}`
async fn delete_client(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let deleted = state.clients.delete(&id).await;
    Ok(Json(json!({ "deleted": deleted })))
}
