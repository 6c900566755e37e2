use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::user_monthly_stats;
use crate::error::AppError;
use crate::policy::{self, Action};
use crate::services::stats_service::MonthlyTotals;
use crate::services::StatsService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the monthly stats route group: `/user-stats/...`
///
/// A rollup row is keyed by (user, year, month); PUT carries
/// update-or-create semantics for that key.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stats).post(create_stats))
        .route(
            "/{user_id}/{year}/{month}",
            get(get_stats)
                .put(upsert_stats)
                .patch(update_stats)
                .delete(delete_stats),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateStatsRequest {
    year: i32,
    month: i32,
    #[serde(default)]
    total_distance_m: f64,
    #[serde(default)]
    total_duration_sec: i32,
}

#[derive(Deserialize)]
struct UpsertStatsRequest {
    total_distance_m: f64,
    total_duration_sec: i32,
}

#[derive(Deserialize)]
struct UpdateStatsRequest {
    total_distance_m: Option<f64>,
    total_duration_sec: Option<i32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/user-stats`
async fn list_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<user_monthly_stats::Model>>, AppError> {
    let rows = StatsService::list(&state.db).await?;
    Ok(Json(rows))
}

/// `POST /api/v1/user-stats` — creates a rollup row for the caller.
async fn create_stats(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(body): Json<CreateStatsRequest>,
) -> Result<(StatusCode, Json<user_monthly_stats::Model>), AppError> {
    let created = StatsService::create(
        &state.db,
        actor.id,
        body.year,
        body.month,
        MonthlyTotals {
            total_distance_m: body.total_distance_m,
            total_duration_sec: body.total_duration_sec,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/v1/user-stats/{user_id}/{year}/{month}`
async fn get_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((user_id, year, month)): Path<(Uuid, i32, i32)>,
) -> Result<Json<user_monthly_stats::Model>, AppError> {
    let found = StatsService::get(&state.db, user_id, year, month)
        .await?
        .ok_or_else(|| AppError::NotFound("Stats not found.".to_string()))?;
    Ok(Json(found))
}

/// `PUT /api/v1/user-stats/{user_id}/{year}/{month}` — update-or-create for
/// the caller's own key.
async fn upsert_stats(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((user_id, year, month)): Path<(Uuid, i32, i32)>,
    Json(body): Json<UpsertStatsRequest>,
) -> Result<Json<user_monthly_stats::Model>, AppError> {
    policy::ensure_owner(actor.id, user_id, Action::Update, "stats")?;

    StatsService::upsert(
        &state.db,
        user_id,
        year,
        month,
        MonthlyTotals {
            total_distance_m: body.total_distance_m,
            total_duration_sec: body.total_duration_sec,
        },
    )
    .await?;

    let refreshed = StatsService::get(&state.db, user_id, year, month)
        .await?
        .ok_or_else(|| AppError::NotFound("Stats not found.".to_string()))?;
    Ok(Json(refreshed))
}

/// `PATCH /api/v1/user-stats/{user_id}/{year}/{month}` — partial update of
/// an existing row; missing rows are not created.
async fn update_stats(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((user_id, year, month)): Path<(Uuid, i32, i32)>,
    Json(body): Json<UpdateStatsRequest>,
) -> Result<Json<user_monthly_stats::Model>, AppError> {
    policy::ensure_owner(actor.id, user_id, Action::Update, "stats")?;

    let existing = StatsService::get(&state.db, user_id, year, month)
        .await?
        .ok_or_else(|| AppError::NotFound("Stats not found.".to_string()))?;

    StatsService::upsert(
        &state.db,
        user_id,
        year,
        month,
        MonthlyTotals {
            total_distance_m: body.total_distance_m.unwrap_or(existing.total_distance_m),
            total_duration_sec: body
                .total_duration_sec
                .unwrap_or(existing.total_duration_sec),
        },
    )
    .await?;

    let refreshed = StatsService::get(&state.db, user_id, year, month)
        .await?
        .ok_or_else(|| AppError::NotFound("Stats not found.".to_string()))?;
    Ok(Json(refreshed))
}

/// `DELETE /api/v1/user-stats/{user_id}/{year}/{month}`
async fn delete_stats(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((user_id, year, month)): Path<(Uuid, i32, i32)>,
) -> Result<StatusCode, AppError> {
    policy::ensure_owner(actor.id, user_id, Action::Delete, "stats")?;

    let deleted = StatsService::delete(&state.db, user_id, year, month).await?;
    if !deleted {
        return Err(AppError::NotFound("Stats not found.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
