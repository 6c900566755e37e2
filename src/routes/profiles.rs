use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::profile;
use crate::error::AppError;
use crate::policy::{self, Action};
use crate::services::profile_service::{ProfileChanges, ProfileInput};
use crate::services::ProfileService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the profile route group: `/profiles/...`
///
/// A profile shares identity with its user, so the item key is the owning
/// user's id.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route(
            "/{user_id}",
            get(get_profile)
                .put(replace_profile)
                .patch(update_profile)
                .delete(delete_profile),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateProfileRequest {
    display_name: String,
    city: Option<String>,
    country: Option<String>,
    gender: Option<String>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age: Option<i32>,
    bio: Option<String>,
}

#[derive(Deserialize)]
struct UpdateProfileRequest {
    display_name: Option<String>,
    city: Option<String>,
    country: Option<String>,
    gender: Option<String>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    age: Option<i32>,
    bio: Option<String>,
}

impl CreateProfileRequest {
    fn into_input(self) -> ProfileInput {
        ProfileInput {
            display_name: self.display_name,
            city: self.city,
            country: self.country,
            gender: self.gender,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age: self.age,
            bio: self.bio,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/profiles`
async fn list_profiles(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<profile::Model>>, AppError> {
    let profiles = ProfileService::list(&state.db).await?;
    Ok(Json(profiles))
}

/// `POST /api/v1/profiles` — creates the caller's own profile.
async fn create_profile(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(body): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<profile::Model>), AppError> {
    let created = ProfileService::create(&state.db, actor.id, body.into_input()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/profiles/{user_id}`
async fn get_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<profile::Model>, AppError> {
    let found = ProfileService::get(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found.".to_string()))?;
    Ok(Json(found))
}

/// `PUT /api/v1/profiles/{user_id}`
async fn replace_profile(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<CreateProfileRequest>,
) -> Result<Json<profile::Model>, AppError> {
    policy::ensure_owner(actor.id, user_id, Action::Update, "profile")?;

    let input = body.into_input();
    let changes = ProfileChanges {
        display_name: Some(input.display_name),
        city: input.city,
        country: input.country,
        gender: input.gender,
        weight_kg: input.weight_kg,
        height_cm: input.height_cm,
        age: input.age,
        bio: input.bio,
    };
    apply_profile_update(&state, user_id, changes).await
}

/// `PATCH /api/v1/profiles/{user_id}`
async fn update_profile(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<profile::Model>, AppError> {
    policy::ensure_owner(actor.id, user_id, Action::Update, "profile")?;

    let changes = ProfileChanges {
        display_name: body.display_name,
        city: body.city,
        country: body.country,
        gender: body.gender,
        weight_kg: body.weight_kg,
        height_cm: body.height_cm,
        age: body.age,
        bio: body.bio,
    };
    apply_profile_update(&state, user_id, changes).await
}

/// `DELETE /api/v1/profiles/{user_id}`
async fn delete_profile(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    policy::ensure_owner(actor.id, user_id, Action::Delete, "profile")?;

    let deleted = ProfileService::delete(&state.db, user_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Profile not found.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

async fn apply_profile_update(
    state: &AppState,
    user_id: Uuid,
    changes: ProfileChanges,
) -> Result<Json<profile::Model>, AppError> {
    let updated = ProfileService::update(&state.db, user_id, changes).await?;
    if !updated {
        return Err(AppError::NotFound("Profile not found.".to_string()));
    }
    let refreshed = ProfileService::get(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found.".to_string()))?;
    Ok(Json(refreshed))
}
