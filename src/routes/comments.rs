use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::comment;
use crate::error::AppError;
use crate::policy::{self, Action};
use crate::services::comment_service::NewComment;
use crate::services::CommentService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the comment route group: `/comments/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route(
            "/{id}",
            get(get_comment)
                .put(replace_comment)
                .patch(update_comment)
                .delete(delete_comment),
        )
        .route("/{id}/replies", get(get_replies))
        .route("/{id}/thread", get(get_thread))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateCommentRequest {
    activity_id: Uuid,
    body: String,
    parent_comment_id: Option<Uuid>,
}

#[derive(Deserialize)]
struct ReplaceCommentRequest {
    body: String,
}

#[derive(Deserialize)]
struct UpdateCommentRequest {
    body: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/comments`
async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<comment::Model>>, AppError> {
    let comments = CommentService::list(&state.db).await?;
    Ok(Json(comments))
}

/// `POST /api/v1/comments` — posts a comment as the caller, optionally as a
/// reply.
async fn create_comment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<comment::Model>), AppError> {
    let created = CommentService::create(
        &state.db,
        actor.id,
        NewComment {
            activity_id: body.activity_id,
            body: body.body,
            parent_comment_id: body.parent_comment_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/comments/{id}`
async fn get_comment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<comment::Model>, AppError> {
    let found = CommentService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;
    Ok(Json(found))
}

/// `PUT /api/v1/comments/{id}`
async fn replace_comment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReplaceCommentRequest>,
) -> Result<Json<comment::Model>, AppError> {
    ensure_comment_owner(&state, actor.id, id, Action::Update).await?;
    apply_comment_update(&state, id, body.body).await
}

/// `PATCH /api/v1/comments/{id}`
async fn update_comment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<comment::Model>, AppError> {
    ensure_comment_owner(&state, actor.id, id, Action::Update).await?;

    match body.body {
        Some(new_body) => apply_comment_update(&state, id, new_body).await,
        None => {
            let found = CommentService::get(&state.db, id)
                .await?
                .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;
            Ok(Json(found))
        }
    }
}

/// `DELETE /api/v1/comments/{id}` — removes the comment and, via cascade,
/// every reply below it.
async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ensure_comment_owner(&state, actor.id, id, Action::Delete).await?;

    let deleted = CommentService::delete(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Comment not found.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/comments/{id}/replies` — direct replies only.
async fn get_replies(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<comment::Model>>, AppError> {
    ensure_comment_exists(&state, id).await?;
    let replies = CommentService::replies(&state.db, id).await?;
    Ok(Json(replies))
}

/// `GET /api/v1/comments/{id}/thread` — the full reply subtree, breadth
/// first.
async fn get_thread(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<comment::Model>>, AppError> {
    ensure_comment_exists(&state, id).await?;
    let thread = CommentService::thread(&state.db, id).await?;
    Ok(Json(thread))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

async fn ensure_comment_exists(state: &AppState, id: Uuid) -> Result<(), AppError> {
    CommentService::get(&state.db, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))
}

async fn ensure_comment_owner(
    state: &AppState,
    actor_id: Uuid,
    comment_id: Uuid,
    action: Action,
) -> Result<(), AppError> {
    let found = CommentService::get(&state.db, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;
    policy::ensure_owner(actor_id, found.user_id, action, "comment")
}

async fn apply_comment_update(
    state: &AppState,
    id: Uuid,
    body: String,
) -> Result<Json<comment::Model>, AppError> {
    let updated = CommentService::update(&state.db, id, body).await?;
    if !updated {
        return Err(AppError::NotFound("Comment not found.".to_string()));
    }
    let refreshed = CommentService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;
    Ok(Json(refreshed))
}
