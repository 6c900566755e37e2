use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::reports::{self, datasets, describe};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Routers
// ─────────────────────────────────────────────────────────────────────────────

/// Build the report route group: `/reports/...`
pub fn router() -> Router<AppState> {
    Router::new().route("/global-stats", get(global_stats))
}

/// Build the analytics route group: `/analytics/...`
///
/// Every action returns `{dataset, statistics, grouped_analysis?}` computed
/// from a tabular projection, or `{message: "no data", statistics: {}}` when
/// the projection is empty.
pub fn analytics_router() -> Router<AppState> {
    Router::new()
        .route("/leaderboard", get(leaderboard))
        .route("/social-engagement", get(social_engagement))
        .route("/monthly-trends", get(monthly_trends))
        .route("/influencers", get(influencers))
        .route("/activity-performance", get(activity_performance))
        .route("/user-levels", get(user_levels))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/reports/global-stats` — public, as the report exposes only
/// aggregates.
async fn global_stats(
    State(state): State<AppState>,
) -> Result<Json<reports::GlobalStatsReport>, AppError> {
    let report = reports::global_stats(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No data available to report.".to_string()))?;
    Ok(Json(report))
}

/// `GET /api/v1/analytics/leaderboard`
async fn leaderboard(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let records = datasets::leaderboard(&state.db).await?;
    Ok(Json(analytics_response(
        records,
        &["total_distance_m", "total_duration_sec"],
        None,
    )))
}

/// `GET /api/v1/analytics/social-engagement`
async fn social_engagement(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let records = datasets::social_engagement(&state.db).await?;
    Ok(Json(analytics_response(
        records,
        &["comment_count", "kudos_count"],
        Some("activity_type"),
    )))
}

/// `GET /api/v1/analytics/monthly-trends`
async fn monthly_trends(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let records = datasets::monthly_trends(&state.db).await?;
    Ok(Json(analytics_response(
        records,
        &["total_distance_m", "total_duration_sec", "active_users"],
        None,
    )))
}

/// `GET /api/v1/analytics/influencers`
async fn influencers(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let records = datasets::influencers(&state.db).await?;
    Ok(Json(analytics_response(
        records,
        &["follower_count", "activity_count"],
        None,
    )))
}

/// `GET /api/v1/analytics/activity-performance`
async fn activity_performance(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let records = datasets::activity_performance(&state.db).await?;
    Ok(Json(analytics_response(
        records,
        &["distance_m", "duration_sec", "elevation_gain_m", "avg_speed_m_s"],
        Some("activity_type"),
    )))
}

/// `GET /api/v1/analytics/user-levels`
async fn user_levels(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let records = datasets::user_levels(&state.db).await?;
    Ok(Json(analytics_response(
        records,
        &["total_distance_m", "activity_count"],
        Some("level"),
    )))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Shape a projection plus its statistics into the analytics response
/// format. An empty projection yields the explicit no-data shape.
fn analytics_response(
    records: Vec<Map<String, Value>>,
    columns: &[&str],
    group_by: Option<&str>,
) -> Value {
    match describe::describe(&records, columns, group_by) {
        None => json!({ "message": "no data", "statistics": {} }),
        Some(stats) => {
            let mut response = json!({
                "dataset": records,
                "statistics": stats.statistics,
            });
            if let (Some(grouped), Some(slot)) =
                (stats.grouped_analysis, response.as_object_mut())
            {
                slot.insert("grouped_analysis".to_string(), json!(grouped));
            }
            response
        }
    }
}
