use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QuerySelect, Set, SqlErr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::profile;
use crate::error::AppError;

const GENDERS: [&str; 3] = ["male", "female", "other"];

/// Profile fields as supplied by the caller. The owning user is never part
/// of the input; it comes from the authenticated request.
#[derive(Debug, Default)]
pub struct ProfileInput {
    pub display_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i32>,
    pub bio: Option<String>,
}

/// Optional field changes for an existing profile.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i32>,
    pub bio: Option<String>,
}

/// Aggregate projection over all profiles, consumed by the global report.
#[derive(Debug, Serialize)]
pub struct ProfileOverview {
    pub total_profiles: u64,
    pub average_age: Option<f64>,
    pub average_weight_kg: Option<f64>,
    pub average_height_cm: Option<f64>,
}

/// Raw aggregate row. The age average is computed from sum and count so the
/// integer column decodes the same on every backend.
#[derive(FromQueryResult)]
struct ProfileAggRow {
    average_weight_kg: Option<f64>,
    average_height_cm: Option<f64>,
    age_sum: Option<i64>,
    age_count: i64,
}

pub struct ProfileService;

impl ProfileService {
    /// Create the profile for `user_id`. At most one profile per user.
    pub async fn create(
        db: &DatabaseConnection,
        user_id: Uuid,
        input: ProfileInput,
    ) -> Result<profile::Model, AppError> {
        validate_gender(input.gender.as_deref())?;
        validate_non_negative("weight_kg", input.weight_kg)?;
        validate_non_negative("height_cm", input.height_cm)?;
        validate_non_negative_int("age", input.age)?;

        let active = profile::ActiveModel {
            user_id: Set(user_id),
            display_name: Set(input.display_name),
            city: Set(input.city),
            country: Set(input.country),
            gender: Set(input.gender),
            weight_kg: Set(input.weight_kg),
            height_cm: Set(input.height_cm),
            age: Set(input.age),
            bio: Set(input.bio),
            created_at: Set(Utc::now().fixed_offset()),
        };

        match active.insert(db).await {
            Ok(model) => Ok(model),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(
                    "Profile for this user already exists.".to_string(),
                )),
                _ => Err(AppError::Internal(err.into())),
            },
        }
    }

    /// Profile lookup is keyed by the owning user's id (1:1 identity).
    pub async fn get(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> Result<Option<profile::Model>, AppError> {
        profile::Entity::find_by_id(user_id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<profile::Model>, AppError> {
        profile::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Apply field changes. Returns `false` when the user has no profile.
    pub async fn update(
        db: &DatabaseConnection,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<bool, AppError> {
        let Some(existing) = Self::get(db, user_id).await? else {
            return Ok(false);
        };

        let changed = changes.display_name.is_some()
            || changes.city.is_some()
            || changes.country.is_some()
            || changes.gender.is_some()
            || changes.weight_kg.is_some()
            || changes.height_cm.is_some()
            || changes.age.is_some()
            || changes.bio.is_some();
        if !changed {
            return Ok(true);
        }

        if changes.gender.is_some() {
            validate_gender(changes.gender.as_deref())?;
        }
        validate_non_negative("weight_kg", changes.weight_kg)?;
        validate_non_negative("height_cm", changes.height_cm)?;
        validate_non_negative_int("age", changes.age)?;

        let mut active: profile::ActiveModel = existing.into();
        if let Some(display_name) = changes.display_name {
            active.display_name = Set(display_name);
        }
        if let Some(city) = changes.city {
            active.city = Set(Some(city));
        }
        if let Some(country) = changes.country {
            active.country = Set(Some(country));
        }
        if let Some(gender) = changes.gender {
            active.gender = Set(Some(gender));
        }
        if let Some(weight_kg) = changes.weight_kg {
            active.weight_kg = Set(Some(weight_kg));
        }
        if let Some(height_cm) = changes.height_cm {
            active.height_cm = Set(Some(height_cm));
        }
        if let Some(age) = changes.age {
            active.age = Set(Some(age));
        }
        if let Some(bio) = changes.bio {
            active.bio = Set(Some(bio));
        }

        active
            .update(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(true)
    }

    /// Delete the profile of `user_id`. Returns `false` when none exists.
    pub async fn delete(db: &DatabaseConnection, user_id: Uuid) -> Result<bool, AppError> {
        let result = profile::Entity::delete_by_id(user_id)
            .exec(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(result.rows_affected > 0)
    }

    /// Aggregate projection for the global report.
    pub async fn overview(db: &DatabaseConnection) -> Result<ProfileOverview, AppError> {
        let total_profiles = profile::Entity::find()
            .count(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        let row = profile::Entity::find()
            .select_only()
            .column_as(
                SimpleExpr::from(Func::avg(Expr::col(profile::Column::WeightKg))),
                "average_weight_kg",
            )
            .column_as(
                SimpleExpr::from(Func::avg(Expr::col(profile::Column::HeightCm))),
                "average_height_cm",
            )
            .column_as(profile::Column::Age.sum(), "age_sum")
            .column_as(profile::Column::Age.count(), "age_count")
            .into_model::<ProfileAggRow>()
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        #[allow(clippy::cast_precision_loss)]
        let average_age = row.as_ref().and_then(|r| {
            let sum = r.age_sum?;
            (r.age_count > 0).then(|| sum as f64 / r.age_count as f64)
        });

        Ok(ProfileOverview {
            total_profiles,
            average_age,
            average_weight_kg: row.as_ref().and_then(|r| r.average_weight_kg),
            average_height_cm: row.as_ref().and_then(|r| r.average_height_cm),
        })
    }
}

fn validate_gender(gender: Option<&str>) -> Result<(), AppError> {
    match gender {
        None => Ok(()),
        Some(g) if GENDERS.contains(&g) => Ok(()),
        Some(g) => Err(AppError::BadRequest(format!(
            "Invalid gender '{g}'. Must be one of: male, female, other."
        ))),
    }
}

fn validate_non_negative(field: &str, value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if v < 0.0 => Err(AppError::BadRequest(format!(
            "{field} cannot be negative."
        ))),
        _ => Ok(()),
    }
}

fn validate_non_negative_int(field: &str, value: Option<i32>) -> Result<(), AppError> {
    match value {
        Some(v) if v < 0 => Err(AppError::BadRequest(format!(
            "{field} cannot be negative."
        ))),
        _ => Ok(()),
    }
}
