use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::activity_point;
use crate::error::AppError;

/// GPS sample fields as supplied by the caller.
#[derive(Debug)]
pub struct NewPoint {
    pub activity_id: Uuid,
    pub lat: f64,
    pub lon: f64,
    pub recorded_at: Option<DateTimeWithTimeZone>,
    pub ele: Option<f64>,
    pub speed: Option<f64>,
    pub cadence: Option<i32>,
}

/// Optional field changes for an existing point. The owning activity is
/// fixed at creation.
#[derive(Debug, Default)]
pub struct PointChanges {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub recorded_at: Option<Option<DateTimeWithTimeZone>>,
    pub ele: Option<Option<f64>>,
    pub speed: Option<Option<f64>>,
    pub cadence: Option<Option<i32>>,
}

pub struct ActivityPointService;

impl ActivityPointService {
    pub async fn create(
        db: &DatabaseConnection,
        input: NewPoint,
    ) -> Result<activity_point::Model, AppError> {
        validate_sample(input.speed, input.cadence)?;

        let active = activity_point::ActiveModel {
            id: Set(Uuid::new_v4()),
            activity_id: Set(input.activity_id),
            lat: Set(input.lat),
            lon: Set(input.lon),
            recorded_at: Set(input.recorded_at),
            ele: Set(input.ele),
            speed: Set(input.speed),
            cadence: Set(input.cadence),
        };

        active
            .insert(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<activity_point::Model>, AppError> {
        activity_point::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<activity_point::Model>, AppError> {
        activity_point::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Apply field changes. Returns `false` when no point with the given id
    /// exists.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: PointChanges,
    ) -> Result<bool, AppError> {
        let Some(existing) = Self::get(db, id).await? else {
            return Ok(false);
        };

        let merged_speed = changes.speed.unwrap_or(existing.speed);
        let merged_cadence = changes.cadence.unwrap_or(existing.cadence);
        validate_sample(merged_speed, merged_cadence)?;

        let mut active: activity_point::ActiveModel = existing.into();
        if let Some(lat) = changes.lat {
            active.lat = Set(lat);
        }
        if let Some(lon) = changes.lon {
            active.lon = Set(lon);
        }
        if let Some(recorded_at) = changes.recorded_at {
            active.recorded_at = Set(recorded_at);
        }
        if let Some(ele) = changes.ele {
            active.ele = Set(ele);
        }
        active.speed = Set(merged_speed);
        active.cadence = Set(merged_cadence);

        active
            .update(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(true)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, AppError> {
        let result = activity_point::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(result.rows_affected > 0)
    }
}

fn validate_sample(speed: Option<f64>, cadence: Option<i32>) -> Result<(), AppError> {
    if let Some(s) = speed
        && s < 0.0
    {
        return Err(AppError::BadRequest("speed cannot be negative.".to_string()));
    }
    if let Some(c) = cadence
        && c < 0
    {
        return Err(AppError::BadRequest("cadence cannot be negative.".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_sample_values() {
        assert!(validate_sample(Some(-0.1), None).is_err());
        assert!(validate_sample(None, Some(-1)).is_err());
        assert!(validate_sample(Some(2.5), Some(90)).is_ok());
        assert!(validate_sample(None, None).is_ok());
    }
}
