use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QuerySelect,
    Set,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{activity, ActivityType};
use crate::error::AppError;

/// Activity fields as supplied by the caller. The owner comes from the
/// authenticated request, never from the body.
#[derive(Debug)]
pub struct NewActivity {
    pub activity_type: String,
    pub duration_sec: f64,
    pub distance_m: f64,
    pub elevation_gain_m: i32,
    pub height: i32,
    pub start_time: Option<DateTimeWithTimeZone>,
    pub end_time: Option<DateTimeWithTimeZone>,
}

/// Optional field changes for an existing activity. Setting a time to
/// `Some(None)` clears it.
#[derive(Debug, Default)]
pub struct ActivityChanges {
    pub activity_type: Option<String>,
    pub duration_sec: Option<f64>,
    pub distance_m: Option<f64>,
    pub elevation_gain_m: Option<i32>,
    pub height: Option<i32>,
    pub start_time: Option<Option<DateTimeWithTimeZone>>,
    pub end_time: Option<Option<DateTimeWithTimeZone>>,
}

/// Aggregate projection over all activities, consumed by the global report.
#[derive(Debug, Serialize)]
pub struct ActivityOverview {
    pub total_activities: i64,
    pub total_distance_meters: Option<f64>,
    pub total_duration_seconds: Option<f64>,
    pub average_elevation_gain: Option<f64>,
}

/// Raw aggregate row. The elevation average is computed from sum and count
/// so the integer column decodes the same on every backend.
#[derive(FromQueryResult)]
struct ActivityAggRow {
    total_activities: i64,
    total_distance_meters: Option<f64>,
    total_duration_seconds: Option<f64>,
    elevation_sum: Option<i64>,
}

pub struct ActivityService;

impl ActivityService {
    /// Record a new activity for `user_id`.
    pub async fn create(
        db: &DatabaseConnection,
        user_id: Uuid,
        input: NewActivity,
    ) -> Result<activity::Model, AppError> {
        let activity_type = parse_activity_type(&input.activity_type)?;
        validate_metrics(
            input.duration_sec,
            input.distance_m,
            input.elevation_gain_m,
            input.height,
        )?;
        validate_times(input.start_time, input.end_time)?;

        let active = activity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            activity_type: Set(activity_type.as_str().to_string()),
            duration_sec: Set(input.duration_sec),
            distance_m: Set(input.distance_m),
            elevation_gain_m: Set(input.elevation_gain_m),
            height: Set(input.height),
            start_time: Set(input.start_time),
            end_time: Set(input.end_time),
        };

        active
            .insert(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<activity::Model>, AppError> {
        activity::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<activity::Model>, AppError> {
        activity::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Apply field changes and re-validate the merged record. Returns
    /// `false` when no activity with the given id exists.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: ActivityChanges,
    ) -> Result<bool, AppError> {
        let Some(existing) = Self::get(db, id).await? else {
            return Ok(false);
        };

        let merged_type = changes
            .activity_type
            .clone()
            .unwrap_or_else(|| existing.activity_type.clone());
        let merged_duration = changes.duration_sec.unwrap_or(existing.duration_sec);
        let merged_distance = changes.distance_m.unwrap_or(existing.distance_m);
        let merged_elevation = changes.elevation_gain_m.unwrap_or(existing.elevation_gain_m);
        let merged_height = changes.height.unwrap_or(existing.height);
        let merged_start = changes.start_time.unwrap_or(existing.start_time);
        let merged_end = changes.end_time.unwrap_or(existing.end_time);

        let activity_type = parse_activity_type(&merged_type)?;
        validate_metrics(merged_duration, merged_distance, merged_elevation, merged_height)?;
        validate_times(merged_start, merged_end)?;

        let mut active: activity::ActiveModel = existing.into();
        active.activity_type = Set(activity_type.as_str().to_string());
        active.duration_sec = Set(merged_duration);
        active.distance_m = Set(merged_distance);
        active.elevation_gain_m = Set(merged_elevation);
        active.height = Set(merged_height);
        active.start_time = Set(merged_start);
        active.end_time = Set(merged_end);

        active
            .update(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(true)
    }

    /// Delete an activity and (via cascade) its points, comments, and kudos.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, AppError> {
        let result = activity::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(result.rows_affected > 0)
    }

    /// Aggregate projection for the global report.
    pub async fn overview(db: &DatabaseConnection) -> Result<ActivityOverview, AppError> {
        let row = activity::Entity::find()
            .select_only()
            .column_as(activity::Column::Id.count(), "total_activities")
            .column_as(activity::Column::DistanceM.sum(), "total_distance_meters")
            .column_as(activity::Column::DurationSec.sum(), "total_duration_seconds")
            .column_as(activity::Column::ElevationGainM.sum(), "elevation_sum")
            .into_model::<ActivityAggRow>()
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(row.map_or(
            ActivityOverview {
                total_activities: 0,
                total_distance_meters: None,
                total_duration_seconds: None,
                average_elevation_gain: None,
            },
            |r| {
                #[allow(clippy::cast_precision_loss)]
                let average_elevation_gain = r.elevation_sum.and_then(|sum| {
                    (r.total_activities > 0).then(|| sum as f64 / r.total_activities as f64)
                });
                ActivityOverview {
                    total_activities: r.total_activities,
                    total_distance_meters: r.total_distance_meters,
                    total_duration_seconds: r.total_duration_seconds,
                    average_elevation_gain,
                }
            },
        ))
    }
}

fn parse_activity_type(raw: &str) -> Result<ActivityType, AppError> {
    ActivityType::from_str(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid activity type '{raw}'. Must be one of: running, cycling, walking, \
             swimming, hiking, yoga, gym, crossfit, other."
        ))
    })
}

fn validate_metrics(
    duration_sec: f64,
    distance_m: f64,
    elevation_gain_m: i32,
    height: i32,
) -> Result<(), AppError> {
    if duration_sec < 0.0 {
        return Err(AppError::BadRequest("duration_sec cannot be negative.".to_string()));
    }
    if distance_m < 0.0 {
        return Err(AppError::BadRequest("distance_m cannot be negative.".to_string()));
    }
    if elevation_gain_m < 0 {
        return Err(AppError::BadRequest(
            "elevation_gain_m cannot be negative.".to_string(),
        ));
    }
    if height < 0 {
        return Err(AppError::BadRequest("height cannot be negative.".to_string()));
    }
    Ok(())
}

fn validate_times(
    start_time: Option<DateTimeWithTimeZone>,
    end_time: Option<DateTimeWithTimeZone>,
) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start_time, end_time)
        && end < start
    {
        return Err(AppError::BadRequest(
            "end_time cannot be earlier than start_time.".to_string(),
        ));
    }
    Ok(())
}
