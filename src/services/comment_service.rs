use std::collections::VecDeque;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{activity, comment};
use crate::error::AppError;

/// Comment fields as supplied by the caller. The author comes from the
/// authenticated request.
#[derive(Debug)]
pub struct NewComment {
    pub activity_id: Uuid,
    pub body: String,
    pub parent_comment_id: Option<Uuid>,
}

/// Per-activity comment count, ordered most-commented first.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct CommentCount {
    pub activity_id: Uuid,
    pub comment_count: i64,
}

pub struct CommentService;

impl CommentService {
    /// Post a comment, optionally as a reply to an existing comment on the
    /// same activity.
    pub async fn create(
        db: &DatabaseConnection,
        user_id: Uuid,
        input: NewComment,
    ) -> Result<comment::Model, AppError> {
        if input.body.trim().is_empty() {
            return Err(AppError::BadRequest("Comment body cannot be empty.".to_string()));
        }

        let activity_exists = activity::Entity::find_by_id(input.activity_id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .is_some();
        if !activity_exists {
            return Err(AppError::NotFound("Activity not found.".to_string()));
        }

        if let Some(parent_id) = input.parent_comment_id {
            let parent = Self::get(db, parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent comment not found.".to_string()))?;
            if parent.activity_id != input.activity_id {
                return Err(AppError::BadRequest(
                    "Parent comment must belong to the same activity.".to_string(),
                ));
            }
        }

        let active = comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            activity_id: Set(input.activity_id),
            user_id: Set(user_id),
            body: Set(input.body),
            parent_comment_id: Set(input.parent_comment_id),
            created_at: Set(Utc::now().fixed_offset()),
        };

        active
            .insert(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<comment::Model>, AppError> {
        comment::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<comment::Model>, AppError> {
        comment::Entity::find()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Replace the body of an existing comment. Returns `false` when no
    /// comment with the given id exists.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        body: String,
    ) -> Result<bool, AppError> {
        if body.trim().is_empty() {
            return Err(AppError::BadRequest("Comment body cannot be empty.".to_string()));
        }

        let Some(existing) = Self::get(db, id).await? else {
            return Ok(false);
        };

        let mut active: comment::ActiveModel = existing.into();
        active.body = Set(body);
        active
            .update(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(true)
    }

    /// Delete a comment and (via cascade) all replies below it.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, AppError> {
        let result = comment::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(result.rows_affected > 0)
    }

    /// Direct replies to a comment, oldest first.
    pub async fn replies(
        db: &DatabaseConnection,
        parent_id: Uuid,
    ) -> Result<Vec<comment::Model>, AppError> {
        comment::Entity::find()
            .filter(comment::Column::ParentCommentId.eq(parent_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    /// Full reply subtree below a comment, traversed iteratively breadth
    /// first (the tree is rooted, so this terminates).
    pub async fn thread(
        db: &DatabaseConnection,
        root_id: Uuid,
    ) -> Result<Vec<comment::Model>, AppError> {
        let mut collected = Vec::new();
        let mut frontier = VecDeque::from([root_id]);

        while let Some(parent_id) = frontier.pop_front() {
            let children = Self::replies(db, parent_id).await?;
            for child in children {
                frontier.push_back(child.id);
                collected.push(child);
            }
        }

        Ok(collected)
    }

    /// Most-commented activities, descending. Tie order is whatever the
    /// database returns.
    pub async fn most_commented(db: &DatabaseConnection) -> Result<Vec<CommentCount>, AppError> {
        comment::Entity::find()
            .select_only()
            .column(comment::Column::ActivityId)
            .column_as(comment::Column::Id.count(), "comment_count")
            .group_by(comment::Column::ActivityId)
            .order_by_desc(comment::Column::Id.count())
            .into_model::<CommentCount>()
            .all(db)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }
}
