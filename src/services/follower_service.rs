use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{follower, user};
use crate::error::AppError;

/// Follower count per followee, ordered most-followed first.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct FollowerCount {
    pub followee_id: Uuid,
    pub follower_count: i64,
}

pub struct FollowerService;

impl FollowerService {
    /// Create a follow edge. The pair is the primary key, so a duplicate
    /// follow is rejected by the store.
    pub async fn create(
        db: &DatabaseConnection,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> Result<follower::Model, AppError> {
        let followee_exists = user::Entity::find_by_id(followee_id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .is_some();
        if !followee_exists {
            return Err(AppError::NotFound("User not found.".to_string()));
        }

        let active = follower::ActiveModel {
            follower_id: Set(follower_id),
            followee_id: Set(followee_id),
            created_at: Set(Utc::now().fixed_offset()),
        };

        match active.insert(db).await {
            Ok(model) => Ok(model),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(
                    "You are already following this user.".to_string(),
                )),
                _ => Err(AppError::Internal(err.into())),
            },
        }
    }

    /// Lookup by the composite key; a follow edge has no independent id.
    pub async fn get(
        db: &DatabaseConnection,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> Result<Option<follower::Model>, AppError> {
        follower::Entity::find_by_id((follower_id, followee_id))
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<follower::Model>, AppError> {
        follower::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Remove a follow edge by its composite key. Returns `false` when the
    /// edge does not exist.
    pub async fn delete(
        db: &DatabaseConnection,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = follower::Entity::delete_many()
            .filter(follower::Column::FollowerId.eq(follower_id))
            .filter(follower::Column::FolloweeId.eq(followee_id))
            .exec(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(result.rows_affected > 0)
    }

    /// Most-followed users, descending, optionally limited. Tie order is
    /// whatever the database returns.
    pub async fn top_followed(
        db: &DatabaseConnection,
        limit: Option<u64>,
    ) -> Result<Vec<FollowerCount>, AppError> {
        let mut query = follower::Entity::find()
            .select_only()
            .column(follower::Column::FolloweeId)
            .column_as(follower::Column::FollowerId.count(), "follower_count")
            .group_by(follower::Column::FolloweeId)
            .order_by_desc(follower::Column::FollowerId.count());

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .into_model::<FollowerCount>()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }
}
