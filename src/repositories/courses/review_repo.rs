//! Review data access. One review per (course, student) pair.

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
    domain::entities::courses::review::Review,
};
use crate::errors::errors::AppError;

#[repository(name = "review", collection = "reviews")]
pub struct ReviewRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl ReviewRepository {
    pub async fn find_by_course_and_student(
        &self,
        course_id: &ObjectId,
        student_id: &ObjectId,
    ) -> Result<Option<Review>, AppError> {
        self.collection::<Review>()
            .find_one(doc! { "course_id": course_id, "student_id": student_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut review: Review) -> Result<Review, AppError> {
        let result = self
            .collection::<Review>()
            .insert_one(&review)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        review.id = result.inserted_id.as_object_id();
        Ok(review)
    }

    /// Re-rating replaces the previous rating in place.
    pub async fn upsert(&self, review: Review) -> Result<(), AppError> {
        let rating_bson = mongodb::bson::to_bson(&review.rating)
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        self.collection::<Review>()
            .update_one(
                doc! { "course_id": review.course_id, "student_id": review.student_id },
                doc! {
                    "$set": {
                        "rating": rating_bson,
                        "review": review.review.as_deref().unwrap_or_default(),
                        "is_active": true,
                        "updated_at": mongodb::bson::DateTime::now(),
                    },
                    "$setOnInsert": {
                        "created_at": review.created_at,
                    },
                },
            )
            .upsert(true)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    pub async fn find_by_course(&self, course_id: &ObjectId) -> Result<Vec<Review>, AppError> {
        self.collection::<Review>()
            .find(doc! { "course_id": course_id, "is_active": true })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Latest reviews across a set of courses, for the tutor dashboard.
    pub async fn find_recent_for_courses(
        &self,
        course_ids: &[ObjectId],
        limit: i64,
    ) -> Result<Vec<Review>, AppError> {
        self.collection::<Review>()
            .find(doc! { "course_id": { "$in": course_ids }, "is_active": true })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_recent(&self, limit: i64) -> Result<Vec<Review>, AppError> {
        self.collection::<Review>()
            .find(doc! { "is_active": true })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// (sum of ratings, count) for recomputing the course aggregate.
    pub async fn rating_stats(&self, course_id: &ObjectId) -> Result<(u64, u64), AppError> {
        let reviews = self.find_by_course(course_id).await?;
        let sum = reviews.iter().map(|r| r.rating as u64).sum();
        Ok((sum, reviews.len() as u64))
    }

    pub async fn deactivate_by_student(&self, student_id: &ObjectId) -> Result<u64, AppError> {
        let result = self
            .collection::<Review>()
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
        let pair_index = IndexModel::builder()
            .keys(doc! { "course_id": 1, "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("course_student_unique".to_string())
                    .build(),
            )
            .build();

        self.collection::<Review>()
            .create_indexes(vec![pair_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
