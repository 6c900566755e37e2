use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{activity, kudos};
use crate::error::AppError;

/// Per-activity kudos count, ordered most-liked first.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct KudosCount {
    pub activity_id: Uuid,
    pub kudos_count: i64,
}

pub struct KudosService;

impl KudosService {
    /// Give kudos to an activity. At most one per (activity, user); the
    /// database index rejects the second attempt.
    pub async fn create(
        db: &DatabaseConnection,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> Result<kudos::Model, AppError> {
        let activity_exists = activity::Entity::find_by_id(activity_id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .is_some();
        if !activity_exists {
            return Err(AppError::NotFound("Activity not found.".to_string()));
        }

        let active = kudos::ActiveModel {
            id: Set(Uuid::new_v4()),
            activity_id: Set(activity_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now().fixed_offset()),
        };

        match active.insert(db).await {
            Ok(model) => Ok(model),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(
                    "You already gave kudos to this activity.".to_string(),
                )),
                _ => Err(AppError::Internal(err.into())),
            },
        }
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<Option<kudos::Model>, AppError> {
        kudos::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<kudos::Model>, AppError> {
        kudos::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, AppError> {
        let result = kudos::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(result.rows_affected > 0)
    }

    /// Most-liked activities, descending. Tie order is whatever the database
    /// returns.
    pub async fn most_kudosed(db: &DatabaseConnection) -> Result<Vec<KudosCount>, AppError> {
        kudos::Entity::find()
            .select_only()
            .column(kudos::Column::ActivityId)
            .column_as(kudos::Column::Id.count(), "kudos_count")
            .group_by(kudos::Column::ActivityId)
            .order_by_desc(kudos::Column::Id.count())
            .into_model::<KudosCount>()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }
}
