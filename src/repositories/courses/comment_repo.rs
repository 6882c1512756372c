//! Course comment data access.

use futures_util::TryStreamExt;
use mongodb::{
    IndexModel,
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
};
use singleton_macro::repository;
use std::sync::Arc;

use crate::{
    caching::redis::RedisClient, core::registry::Repository, db::Database,
    domain::entities::courses::comment::Comment,
};
use crate::errors::errors::AppError;

#[repository(name = "comment", collection = "comments")]
pub struct CommentRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl CommentRepository {
    pub async fn create(&self, mut comment: Comment) -> Result<Comment, AppError> {
        let result = self
            .collection::<Comment>()
            .insert_one(&comment)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        comment.id = result.inserted_id.as_object_id();
        Ok(comment)
    }

    pub async fn find_by_course(
        &self,
        course_id: &ObjectId,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Comment>, AppError> {
        self.collection::<Comment>()
            .find(doc! { "course_id": course_id, "is_active": true })
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_recent(&self, limit: i64) -> Result<Vec<Comment>, AppError> {
        self.collection::<Comment>()
            .find(doc! { "is_active": true })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Soft delete: the author or an admin hides the comment.
    pub async fn deactivate(&self, id: &str) -> Result<bool, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let result = self
            .collection::<Comment>()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": { "is_active": false, "updated_at": mongodb::bson::DateTime::now() } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count > 0)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Comment>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        self.collection::<Comment>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn deactivate_by_student(&self, student_id: &ObjectId) -> Result<u64, AppError> {
        let result = self
            .collection::<Comment>()
            .update_many(
                doc! { "student_id": student_id },
                doc! { "$set": {
                    "is_active": false,
                    "updated_at": mongodb::bson::DateTime::now(),
                } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("course_created".to_string())
                    .build(),
            )
            .build();

        self.collection::<Comment>()
            .create_indexes(vec![course_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
