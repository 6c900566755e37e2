use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::password;
use crate::entities::{profile, user};
use crate::error::AppError;

/// Optional field changes for an existing user. `None` leaves a field
/// untouched; a `None` password in particular never clears the hash.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Aggregate counters over the user table, consumed by the global report.
#[derive(Debug, Serialize)]
pub struct UserOverview {
    pub total_users: u64,
    pub users_with_profiles: u64,
}

pub struct UserService;

impl UserService {
    /// Register a new user with a hashed password.
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        plain_password: &str,
    ) -> Result<user::Model, AppError> {
        password::validate_username(username).map_err(AppError::BadRequest)?;
        password::validate_email(email).map_err(AppError::BadRequest)?;
        password::validate_password(plain_password).map_err(AppError::BadRequest)?;

        let hash = password::hash_password(plain_password)?;

        let active = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            email: Set(email.trim().to_lowercase()),
            password_hash: Set(hash),
            created_at: Set(Utc::now().fixed_offset()),
        };

        match active.insert(db).await {
            Ok(model) => Ok(model),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(
                    "Username or email is already taken.".to_string(),
                )),
                _ => Err(AppError::Internal(err.into())),
            },
        }
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<Option<user::Model>, AppError> {
        user::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<user::Model>, AppError> {
        user::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Apply field changes to an existing user. Returns `false` when no user
    /// with the given id exists.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<bool, AppError> {
        let Some(existing) = Self::get(db, id).await? else {
            return Ok(false);
        };

        let changed =
            changes.username.is_some() || changes.email.is_some() || changes.password.is_some();
        if !changed {
            return Ok(true);
        }

        let mut active: user::ActiveModel = existing.into();

        if let Some(ref username) = changes.username {
            password::validate_username(username).map_err(AppError::BadRequest)?;
            active.username = Set(username.clone());
        }
        if let Some(ref email) = changes.email {
            password::validate_email(email).map_err(AppError::BadRequest)?;
            active.email = Set(email.trim().to_lowercase());
        }
        if let Some(ref plain) = changes.password {
            password::validate_password(plain).map_err(AppError::BadRequest)?;
            active.password_hash = Set(password::hash_password(plain)?);
        }

        match active.update(db).await {
            Ok(_) => Ok(true),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(
                    "Username or email is already taken.".to_string(),
                )),
                _ => Err(AppError::Internal(err.into())),
            },
        }
    }

    /// Delete a user and (via cascade) everything the user owns. Returns
    /// `false` when no row was affected.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, AppError> {
        let result = user::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(result.rows_affected > 0)
    }

    /// Look a user up by username, for login.
    pub async fn get_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<user::Model>, AppError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Aggregate projection for the global report.
    pub async fn overview(db: &DatabaseConnection) -> Result<UserOverview, AppError> {
        let total_users = user::Entity::find()
            .count(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        // One profile per user, so the profile count is the number of users
        // that completed one.
        let users_with_profiles = profile::Entity::find()
            .count(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(UserOverview {
            total_users,
            users_with_profiles,
        })
    }
}
