use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::user;
use crate::error::AppError;
use crate::policy::{self, Action};
use crate::services::user_service::UserChanges;
use crate::services::UserService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the user route group: `/users/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register_user))
        .route(
            "/{id}",
            get(get_user)
                .put(replace_user)
                .patch(update_user)
                .delete(delete_user),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct ReplaceUserRequest {
    username: String,
    email: String,
    /// Omitted or null leaves the current password in place.
    password: Option<String>,
}

#[derive(Deserialize)]
struct UpdateUserRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/users`
async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<user::Model>>, AppError> {
    let users = UserService::list(&state.db).await?;
    Ok(Json(users))
}

/// `POST /api/v1/users` — open registration, mirrors `/auth/signup` without
/// issuing a token.
async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<user::Model>), AppError> {
    let created =
        UserService::create(&state.db, &body.username, &body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/users/{id}`
async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<user::Model>, AppError> {
    let found = UserService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;
    Ok(Json(found))
}

/// `PUT /api/v1/users/{id}`
async fn replace_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReplaceUserRequest>,
) -> Result<Json<user::Model>, AppError> {
    policy::ensure_owner(actor.id, id, Action::Update, "account")?;

    let changes = UserChanges {
        username: Some(body.username),
        email: Some(body.email),
        password: body.password,
    };
    apply_user_update(&state, id, changes).await
}

/// `PATCH /api/v1/users/{id}`
async fn update_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<user::Model>, AppError> {
    policy::ensure_owner(actor.id, id, Action::Update, "account")?;

    let changes = UserChanges {
        username: body.username,
        email: body.email,
        password: body.password,
    };
    apply_user_update(&state, id, changes).await
}

/// `DELETE /api/v1/users/{id}` — removes the account and, via cascade,
/// everything it owns.
async fn delete_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    policy::ensure_owner(actor.id, id, Action::Delete, "account")?;

    let deleted = UserService::delete(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound("User not found.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

async fn apply_user_update(
    state: &AppState,
    id: Uuid,
    changes: UserChanges,
) -> Result<Json<user::Model>, AppError> {
    let updated = UserService::update(&state.db, id, changes).await?;
    if !updated {
        return Err(AppError::NotFound("User not found.".to_string()));
    }
    let refreshed = UserService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;
    Ok(Json(refreshed))
}
