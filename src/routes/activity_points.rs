use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::activity_point;
use crate::error::AppError;
use crate::policy::{self, Action};
use crate::services::point_service::{NewPoint, PointChanges};
use crate::services::{ActivityPointService, ActivityService};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the GPS point route group: `/activity-points/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_points).post(create_point))
        .route(
            "/{id}",
            get(get_point)
                .put(replace_point)
                .patch(update_point)
                .delete(delete_point),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CreatePointRequest {
    activity_id: Uuid,
    lat: f64,
    lon: f64,
    recorded_at: Option<DateTimeWithTimeZone>,
    ele: Option<f64>,
    speed: Option<f64>,
    cadence: Option<i32>,
}

#[derive(Deserialize)]
struct UpdatePointRequest {
    lat: Option<f64>,
    lon: Option<f64>,
    recorded_at: Option<DateTimeWithTimeZone>,
    ele: Option<f64>,
    speed: Option<f64>,
    cadence: Option<i32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/activity-points`
async fn list_points(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<activity_point::Model>>, AppError> {
    let points = ActivityPointService::list(&state.db).await?;
    Ok(Json(points))
}

/// `POST /api/v1/activity-points` — points can only be added to the caller's
/// own activities.
async fn create_point(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(body): Json<CreatePointRequest>,
) -> Result<(StatusCode, Json<activity_point::Model>), AppError> {
    ensure_parent_activity_owner(&state, actor.id, body.activity_id, Action::Create).await?;

    let created = ActivityPointService::create(
        &state.db,
        NewPoint {
            activity_id: body.activity_id,
            lat: body.lat,
            lon: body.lon,
            recorded_at: body.recorded_at,
            ele: body.ele,
            speed: body.speed,
            cadence: body.cadence,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/activity-points/{id}`
async fn get_point(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<activity_point::Model>, AppError> {
    let found = ActivityPointService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity point not found.".to_string()))?;
    Ok(Json(found))
}

/// `PUT /api/v1/activity-points/{id}`
async fn replace_point(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreatePointRequest>,
) -> Result<Json<activity_point::Model>, AppError> {
    ensure_point_owner(&state, actor.id, id, Action::Update).await?;

    let changes = PointChanges {
        lat: Some(body.lat),
        lon: Some(body.lon),
        recorded_at: Some(body.recorded_at),
        ele: Some(body.ele),
        speed: Some(body.speed),
        cadence: Some(body.cadence),
    };
    apply_point_update(&state, id, changes).await
}

/// `PATCH /api/v1/activity-points/{id}`
async fn update_point(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePointRequest>,
) -> Result<Json<activity_point::Model>, AppError> {
    ensure_point_owner(&state, actor.id, id, Action::Update).await?;

    let changes = PointChanges {
        lat: body.lat,
        lon: body.lon,
        recorded_at: body.recorded_at.map(Some),
        ele: body.ele.map(Some),
        speed: body.speed.map(Some),
        cadence: body.cadence.map(Some),
    };
    apply_point_update(&state, id, changes).await
}

/// `DELETE /api/v1/activity-points/{id}`
async fn delete_point(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ensure_point_owner(&state, actor.id, id, Action::Delete).await?;

    let deleted = ActivityPointService::delete(&state.db, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Activity point not found.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// A point is owned through its activity; check the activity's owner.
async fn ensure_parent_activity_owner(
    state: &AppState,
    actor_id: Uuid,
    activity_id: Uuid,
    action: Action,
) -> Result<(), AppError> {
    let parent = ActivityService::get(&state.db, activity_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found.".to_string()))?;
    policy::ensure_owner(actor_id, parent.user_id, action, "activity's points")
}

async fn ensure_point_owner(
    state: &AppState,
    actor_id: Uuid,
    point_id: Uuid,
    action: Action,
) -> Result<(), AppError> {
    let point = ActivityPointService::get(&state.db, point_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity point not found.".to_string()))?;
    ensure_parent_activity_owner(state, actor_id, point.activity_id, action).await
}

async fn apply_point_update(
    state: &AppState,
    id: Uuid,
    changes: PointChanges,
) -> Result<Json<activity_point::Model>, AppError> {
    let updated = ActivityPointService::update(&state.db, id, changes).await?;
    if !updated {
        return Err(AppError::NotFound("Activity point not found.".to_string()));
    }
    let refreshed = ActivityPointService::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity point not found.".to_string()))?;
    Ok(Json(refreshed))
}
