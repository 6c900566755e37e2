use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::follower;
use crate::error::AppError;
use crate::policy::{self, Action};
use crate::services::FollowerService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the follower route group: `/followers/...`
///
/// A follow edge is identified by its (follower, followee) pair; there is no
/// update verb, an edge is created or deleted.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_followers).post(follow))
        .route(
            "/{follower_id}/{followee_id}",
            get(get_follower).delete(unfollow),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FollowRequest {
    followee_id: Uuid,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/followers`
async fn list_followers(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<follower::Model>>, AppError> {
    let edges = FollowerService::list(&state.db).await?;
    Ok(Json(edges))
}

/// `POST /api/v1/followers` — the caller follows `followee_id`.
async fn follow(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(body): Json<FollowRequest>,
) -> Result<(StatusCode, Json<follower::Model>), AppError> {
    if body.followee_id == actor.id {
        return Err(AppError::BadRequest(
            "You cannot follow yourself.".to_string(),
        ));
    }

    let created = FollowerService::create(&state.db, actor.id, body.followee_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/followers/{follower_id}/{followee_id}`
async fn get_follower(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((follower_id, followee_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<follower::Model>, AppError> {
    let found = FollowerService::get(&state.db, follower_id, followee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Follow relation not found.".to_string()))?;
    Ok(Json(found))
}

/// `DELETE /api/v1/followers/{follower_id}/{followee_id}` — only the
/// follower side of the edge can unfollow.
async fn unfollow(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((follower_id, followee_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    policy::ensure_owner(actor.id, follower_id, Action::Delete, "follow relation")?;

    let deleted = FollowerService::delete(&state.db, follower_id, followee_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Follow relation not found.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
