use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::activity;
use crate::error::AppError;
use crate::policy::{self, Action};
use crate::services::activity_service::{ActivityChanges, NewActivity};
use crate::services::ActivityService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the activity route group: `/activities/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route(
            "/{id}",
            get(get_activity)
                .put(replace_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateActivityRequest {
    /// Defaults to `"other"` when omitted.
    activity_type: Option<String>,
    duration_sec: f64,
    distance_m: f64,
    elevation_gain_m: i32,
    height: i32,
    start_time: Option<DateTimeWithTimeZone>,
    end_time: Option<DateTimeWithTimeZone>,
}

#[derive(Deserialize)]
struct UpdateActivityRequest {
    activity_type: Option<String>,
    duration_sec: Option<f64>,
    distance_m: Option<f64>,
    elevation_gain_m: Option<i32>,
    height: Option<i32>,
    /// A PATCH cannot clear a time; send PUT with the field omitted instead.
    start_time: Option<DateTimeWithTimeZone>,
    end_time: Option<DateTimeWithTimeZone>,
}

impl CreateActivityRequest {
    fn into_new(self) -> NewActivity {
        NewActivity {
            activity_type: self.activity_type.unwrap_or_else(|| "other".to_string()),
            duration_sec: self.duration_sec,
            distance_m: self.distance_m,
            elevation_gain_m: self.elevation_gain_m,
            height: self.height,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/activities`
async fn list_activities(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<activity::Model>>, AppError> {
    let activities = ActivityService::list(&state.db).await?;
    Ok(Json(activities))
}

/// `POST /api/v1/activities` — records an activity for the caller.
async fn create_activity(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(body): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<activity::Model>), AppError> {
    let created = ActivityService::create(&state.db, actor.id, body.into_new()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/activities/{id}`
async fn get_activity(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<activity::Model>, AppError> {
    let found = ActivityService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found.".to_string()))?;
    Ok(Json(found))
}

/// `PUT /api/v1/activities/{id}`
async fn replace_activity(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateActivityRequest>,
) -> Result<Json<activity::Model>, AppError> {
    ensure_activity_owner(&state, actor.id, id, Action::Update).await?;

    let input = body.into_new();
    let changes = ActivityChanges {
        activity_type: Some(input.activity_type),
        duration_sec: Some(input.duration_sec),
        distance_m: Some(input.distance_m),
        elevation_gain_m: Some(input.elevation_gain_m),
        height: Some(input.height),
        start_time: Some(input.start_time),
        end_time: Some(input.end_time),
    };
    apply_activity_update(&state, id, changes).await
}

/// `PATCH /api/v1/activities/{id}`
async fn update_activity(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateActivityRequest>,
) -> Result<Json<activity::Model>, AppError> {
    ensure_activity_owner(&state, actor.id, id, Action::Update).await?;

    let changes = ActivityChanges {
        activity_type: body.activity_type,
        duration_sec: body.duration_sec,
        distance_m: body.distance_m,
        elevation_gain_m: body.elevation_gain_m,
        height: body.height,
        start_time: body.start_time.map(Some),
        end_time: body.end_time.map(Some),
    };
    apply_activity_update(&state, id, changes).await
}

/// `DELETE /api/v1/activities/{id}` — removes the activity and, via cascade,
/// its points, comments, and kudos.
async fn delete_activity(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ensure_activity_owner(&state, actor.id, id, Action::Delete).await?;

    let deleted = ActivityService::delete(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Activity not found.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve the activity's owner and run the ownership policy against it.
async fn ensure_activity_owner(
    state: &AppState,
    actor_id: Uuid,
    activity_id: Uuid,
    action: Action,
) -> Result<(), AppError> {
    let found = ActivityService::get(&state.db, activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found.".to_string()))?;
    policy::ensure_owner(actor_id, found.user_id, action, "activity")
}

async fn apply_activity_update(
    state: &AppState,
    id: Uuid,
    changes: ActivityChanges,
) -> Result<Json<activity::Model>, AppError> {
    let updated = ActivityService::update(&state.db, id, changes).await?;
    if !updated {
        return Err(AppError::NotFound("Activity not found.".to_string()));
    }
    let refreshed = ActivityService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found.".to_string()))?;
    Ok(Json(refreshed))
}
