//! Tabular projections backing the analytics endpoints.
//!
//! Each builder produces a flat list of JSON records that
//! [`describe`](super::describe::describe) can run over. Everything is
//! recomputed from the live tables on every call.

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryOrder, QuerySelect,
};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::entities::{activity, user, user_monthly_stats};
use crate::error::AppError;
use crate::services::{ActivityService, CommentService, FollowerService, KudosService};

/// Lifetime distance thresholds (meters) for the `user-levels` projection.
const LEVEL_INTERMEDIATE_M: f64 = 50_000.0;
const LEVEL_ADVANCED_M: f64 = 250_000.0;
const LEVEL_ELITE_M: f64 = 1_000_000.0;

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[derive(FromQueryResult)]
struct UserTotalsRow {
    user_id: Uuid,
    total_distance_m: Option<f64>,
    total_duration_sec: Option<i64>,
}

#[derive(FromQueryResult)]
struct TrendRow {
    year: i32,
    month: i32,
    total_distance_m: Option<f64>,
    total_duration_sec: Option<i64>,
    active_users: i64,
}

#[derive(FromQueryResult)]
struct UserActivityCount {
    user_id: Uuid,
    activity_count: i64,
}

/// Lifetime totals per user from the monthly rollups.
async fn user_totals(db: &DatabaseConnection) -> Result<Vec<UserTotalsRow>, AppError> {
    user_monthly_stats::Entity::find()
        .select_only()
        .column(user_monthly_stats::Column::UserId)
        .column_as(
            user_monthly_stats::Column::TotalDistanceM.sum(),
            "total_distance_m",
        )
        .column_as(
            user_monthly_stats::Column::TotalDurationSec.sum(),
            "total_duration_sec",
        )
        .group_by(user_monthly_stats::Column::UserId)
        .order_by_desc(user_monthly_stats::Column::TotalDistanceM.sum())
        .into_model::<UserTotalsRow>()
        .all(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

/// Number of recorded activities per user.
async fn activity_counts(db: &DatabaseConnection) -> Result<HashMap<Uuid, i64>, AppError> {
    let rows = activity::Entity::find()
        .select_only()
        .column(activity::Column::UserId)
        .column_as(activity::Column::Id.count(), "activity_count")
        .group_by(activity::Column::UserId)
        .into_model::<UserActivityCount>()
        .all(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(rows.into_iter().map(|r| (r.user_id, r.activity_count)).collect())
}

/// id -> username for every user.
async fn usernames(db: &DatabaseConnection) -> Result<HashMap<Uuid, String>, AppError> {
    let users = user::Entity::find()
        .all(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
}

/// One row per user with lifetime distance and duration, furthest first.
pub async fn leaderboard(db: &DatabaseConnection) -> Result<Vec<Map<String, Value>>, AppError> {
    let names = usernames(db).await?;
    let rows = user_totals(db).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            obj(json!({
                "username": names.get(&row.user_id).cloned().unwrap_or_default(),
                "total_distance_m": row.total_distance_m.unwrap_or(0.0),
                "total_duration_sec": row.total_duration_sec.unwrap_or(0),
            }))
        })
        .collect())
}

/// One row per activity with its comment and kudos counts.
pub async fn social_engagement(
    db: &DatabaseConnection,
) -> Result<Vec<Map<String, Value>>, AppError> {
    let activities = ActivityService::list(db).await?;
    let comments: HashMap<Uuid, i64> = CommentService::most_commented(db)
        .await?
        .into_iter()
        .map(|c| (c.activity_id, c.comment_count))
        .collect();
    let kudos: HashMap<Uuid, i64> = KudosService::most_kudosed(db)
        .await?
        .into_iter()
        .map(|k| (k.activity_id, k.kudos_count))
        .collect();

    Ok(activities
        .into_iter()
        .map(|a| {
            obj(json!({
                "activity_id": a.id.to_string(),
                "activity_type": a.activity_type,
                "comment_count": comments.get(&a.id).copied().unwrap_or(0),
                "kudos_count": kudos.get(&a.id).copied().unwrap_or(0),
            }))
        })
        .collect())
}

/// One row per calendar month with platform-wide totals and the number of
/// users active that month.
pub async fn monthly_trends(db: &DatabaseConnection) -> Result<Vec<Map<String, Value>>, AppError> {
    let rows = user_monthly_stats::Entity::find()
        .select_only()
        .column(user_monthly_stats::Column::Year)
        .column(user_monthly_stats::Column::Month)
        .column_as(
            user_monthly_stats::Column::TotalDistanceM.sum(),
            "total_distance_m",
        )
        .column_as(
            user_monthly_stats::Column::TotalDurationSec.sum(),
            "total_duration_sec",
        )
        .column_as(
            user_monthly_stats::Column::UserId.count(),
            "active_users",
        )
        .group_by(user_monthly_stats::Column::Year)
        .group_by(user_monthly_stats::Column::Month)
        .order_by_asc(user_monthly_stats::Column::Year)
        .order_by_asc(user_monthly_stats::Column::Month)
        .into_model::<TrendRow>()
        .all(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(rows
        .into_iter()
        .map(|row| {
            obj(json!({
                "year": row.year,
                "month": row.month,
                "total_distance_m": row.total_distance_m.unwrap_or(0.0),
                "total_duration_sec": row.total_duration_sec.unwrap_or(0),
                "active_users": row.active_users,
            }))
        })
        .collect())
}

/// One row per followed user with follower and activity counts, most
/// followed first.
pub async fn influencers(db: &DatabaseConnection) -> Result<Vec<Map<String, Value>>, AppError> {
    let names = usernames(db).await?;
    let activities = activity_counts(db).await?;
    let follower_counts = FollowerService::top_followed(db, None).await?;

    Ok(follower_counts
        .into_iter()
        .map(|row| {
            obj(json!({
                "username": names.get(&row.followee_id).cloned().unwrap_or_default(),
                "follower_count": row.follower_count,
                "activity_count": activities.get(&row.followee_id).copied().unwrap_or(0),
            }))
        })
        .collect())
}

/// One row per activity with its raw performance metrics.
pub async fn activity_performance(
    db: &DatabaseConnection,
) -> Result<Vec<Map<String, Value>>, AppError> {
    let activities = ActivityService::list(db).await?;

    Ok(activities
        .into_iter()
        .map(|a| {
            let avg_speed = if a.duration_sec > 0.0 {
                a.distance_m / a.duration_sec
            } else {
                0.0
            };
            obj(json!({
                "activity_id": a.id.to_string(),
                "activity_type": a.activity_type,
                "distance_m": a.distance_m,
                "duration_sec": a.duration_sec,
                "elevation_gain_m": a.elevation_gain_m,
                "avg_speed_m_s": avg_speed,
            }))
        })
        .collect())
}

/// One row per user with a categorical level derived from lifetime distance.
pub async fn user_levels(db: &DatabaseConnection) -> Result<Vec<Map<String, Value>>, AppError> {
    let names = usernames(db).await?;
    let activities = activity_counts(db).await?;
    let totals = user_totals(db).await?;

    Ok(totals
        .into_iter()
        .map(|row| {
            let distance = row.total_distance_m.unwrap_or(0.0);
            obj(json!({
                "username": names.get(&row.user_id).cloned().unwrap_or_default(),
                "level": level_for(distance),
                "total_distance_m": distance,
                "activity_count": activities.get(&row.user_id).copied().unwrap_or(0),
            }))
        })
        .collect())
}

/// Categorize lifetime distance into a named level.
const fn level_for(distance_m: f64) -> &'static str {
    if distance_m < LEVEL_INTERMEDIATE_M {
        "beginner"
    } else if distance_m < LEVEL_ADVANCED_M {
        "intermediate"
    } else if distance_m < LEVEL_ELITE_M {
        "advanced"
    } else {
        "elite"
    }
}
