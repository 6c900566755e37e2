use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::kudos;
use crate::error::AppError;
use crate::policy::{self, Action};
use crate::services::KudosService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the kudos route group: `/kudos/...`
///
/// Kudos has no mutable field, so there is no update verb; an edge is given
/// or taken back.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_kudos).post(give_kudos))
        .route("/{id}", get(get_kudos).delete(delete_kudos))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GiveKudosRequest {
    activity_id: Uuid,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/kudos`
async fn list_kudos(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<kudos::Model>>, AppError> {
    let all = KudosService::list(&state.db).await?;
    Ok(Json(all))
}

/// `POST /api/v1/kudos` — gives kudos as the caller; a second kudos on the
/// same activity is a conflict.
async fn give_kudos(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(body): Json<GiveKudosRequest>,
) -> Result<(StatusCode, Json<kudos::Model>), AppError> {
    let created = KudosService::create(&state.db, actor.id, body.activity_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/kudos/{id}`
async fn get_kudos(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<kudos::Model>, AppError> {
    let found = KudosService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Kudos not found.".to_string()))?;
    Ok(Json(found))
}

/// `DELETE /api/v1/kudos/{id}` — only the giver can take kudos back.
async fn delete_kudos(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let found = KudosService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Kudos not found.".to_string()))?;
    policy::ensure_owner(actor.id, found.user_id, Action::Delete, "kudos")?;

    let deleted = KudosService::delete(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Kudos not found.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
