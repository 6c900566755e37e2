use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{user, user_monthly_stats};
use crate::error::AppError;

/// Monthly totals as supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct MonthlyTotals {
    pub total_distance_m: f64,
    pub total_duration_sec: i32,
}

/// Lifetime distance per user, ordered furthest first.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct DistanceLeader {
    pub username: String,
    pub total_distance: Option<f64>,
}

pub struct StatsService;

impl StatsService {
    /// Create the rollup row for one user-month. The composite primary key
    /// rejects a second row for the same month.
    pub async fn create(
        db: &DatabaseConnection,
        user_id: Uuid,
        year: i32,
        month: i32,
        totals: MonthlyTotals,
    ) -> Result<user_monthly_stats::Model, AppError> {
        validate_month(month)?;
        validate_totals(totals)?;

        let active = user_monthly_stats::ActiveModel {
            user_id: Set(user_id),
            year: Set(year),
            month: Set(month),
            total_distance_m: Set(totals.total_distance_m),
            total_duration_sec: Set(totals.total_duration_sec),
        };

        match active.insert(db).await {
            Ok(model) => Ok(model),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(
                    "Stats for this month already exist.".to_string(),
                )),
                _ => Err(AppError::Internal(err.into())),
            },
        }
    }

    /// Lookup by the composite key (user, year, month).
    pub async fn get(
        db: &DatabaseConnection,
        user_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<Option<user_monthly_stats::Model>, AppError> {
        user_monthly_stats::Entity::find_by_id((user_id, year, month))
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<user_monthly_stats::Model>, AppError> {
        user_monthly_stats::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Update-or-create keyed by (user, year, month). Returns `true` when an
    /// existing row was updated, `false` when a new one was created.
    pub async fn upsert(
        db: &DatabaseConnection,
        user_id: Uuid,
        year: i32,
        month: i32,
        totals: MonthlyTotals,
    ) -> Result<bool, AppError> {
        validate_month(month)?;
        validate_totals(totals)?;

        match Self::get(db, user_id, year, month).await? {
            Some(existing) => {
                let mut active: user_monthly_stats::ActiveModel = existing.into();
                active.total_distance_m = Set(totals.total_distance_m);
                active.total_duration_sec = Set(totals.total_duration_sec);
                active
                    .update(db)
                    .await
                    .map_err(|e| AppError::Internal(e.into()))?;
                Ok(true)
            }
            None => {
                Self::create(db, user_id, year, month, totals).await?;
                Ok(false)
            }
        }
    }

    /// Remove one rollup row by its composite key. Returns `false` when the
    /// row does not exist.
    pub async fn delete(
        db: &DatabaseConnection,
        user_id: Uuid,
        year: i32,
        month: i32,
    ) -> Result<bool, AppError> {
        let result = user_monthly_stats::Entity::delete_many()
            .filter(user_monthly_stats::Column::UserId.eq(user_id))
            .filter(user_monthly_stats::Column::Year.eq(year))
            .filter(user_monthly_stats::Column::Month.eq(month))
            .exec(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(result.rows_affected > 0)
    }

    /// Global distance leaderboard: lifetime distance summed over all months
    /// per user, grouped by username, descending.
    pub async fn distance_leaderboard(
        db: &DatabaseConnection,
    ) -> Result<Vec<DistanceLeader>, AppError> {
        user_monthly_stats::Entity::find()
            .select_only()
            .column(user::Column::Username)
            .column_as(
                user_monthly_stats::Column::TotalDistanceM.sum(),
                "total_distance",
            )
            .join(JoinType::InnerJoin, user_monthly_stats::Relation::User.def())
            .group_by(user::Column::Username)
            .order_by_desc(user_monthly_stats::Column::TotalDistanceM.sum())
            .into_model::<DistanceLeader>()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }
}

fn validate_month(month: i32) -> Result<(), AppError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "month must be between 1 and 12.".to_string(),
        ))
    }
}

fn validate_totals(totals: MonthlyTotals) -> Result<(), AppError> {
    if totals.total_distance_m < 0.0 {
        return Err(AppError::BadRequest(
            "total_distance_m cannot be negative.".to_string(),
        ));
    }
    if totals.total_duration_sec < 0 {
        return Err(AppError::BadRequest(
            "total_duration_sec cannot be negative.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn totals_must_be_non_negative() {
        let bad = MonthlyTotals {
            total_distance_m: -1.0,
            total_duration_sec: 0,
        };
        assert!(validate_totals(bad).is_err());

        let ok = MonthlyTotals {
            total_distance_m: 42_195.0,
            total_duration_sec: 14_400,
        };
        assert!(validate_totals(ok).is_ok());
    }
}
