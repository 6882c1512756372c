//! Enrollment data access: what each student owns and how far they are.

use futures_util::TryStreamExt;
use mongodb::{
    IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
};
use singleton_macro::repository;
use std::sync::Arc;

use crate::{
    caching::redis::RedisClient, core::registry::Repository, db::Database,
    domain::entities::commerce::purchased_course::PurchasedCourse,
};
use crate::errors::errors::AppError;

#[repository(name = "purchasedcourse", collection = "purchased_courses")]
pub struct PurchasedCourseRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl PurchasedCourseRepository {
    pub async fn create(&self, mut purchase: PurchasedCourse) -> Result<PurchasedCourse, AppError> {
        let result = self
            .collection::<PurchasedCourse>()
            .insert_one(&purchase)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        purchase.id = result.inserted_id.as_object_id();
        Ok(purchase)
    }

    pub async fn find_enrollment(
        &self,
        student_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<Option<PurchasedCourse>, AppError> {
        self.collection::<PurchasedCourse>()
            .find_one(doc! {
                "student_id": student_id,
                "course_id": course_id,
                "is_active": true,
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_student(
        &self,
        student_id: &ObjectId,
    ) -> Result<Vec<PurchasedCourse>, AppError> {
        self.collection::<PurchasedCourse>()
            .find(doc! { "student_id": student_id, "is_active": true })
            .sort(doc! { "purchased_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_course(
        &self,
        course_id: &ObjectId,
    ) -> Result<Vec<PurchasedCourse>, AppError> {
        self.collection::<PurchasedCourse>()
            .find(doc! { "course_id": course_id, "is_active": true })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// All active enrollments across a set of courses, optionally limited
    /// to those purchased on or after `since`.
    pub async fn find_by_courses(
        &self,
        course_ids: &[ObjectId],
        since: Option<mongodb::bson::DateTime>,
    ) -> Result<Vec<PurchasedCourse>, AppError> {
        let mut filter = doc! { "course_id": { "$in": course_ids }, "is_active": true };
        if let Some(since) = since {
            filter.insert("purchased_at", doc! { "$gte": since });
        }

        self.collection::<PurchasedCourse>()
            .find(filter)
            .sort(doc! { "purchased_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_recent(&self, limit: i64) -> Result<Vec<PurchasedCourse>, AppError> {
        self.collection::<PurchasedCourse>()
            .find(doc! { "is_active": true })
            .sort(doc! { "purchased_at": -1 })
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Replaces the progress arrays wholesale. The service recomputes both
    /// arrays and the completion flag from full state on every report, so a
    /// single `$set` keeps the document consistent.
    pub async fn update(
        &self,
        id: &ObjectId,
        update_doc: Document,
    ) -> Result<Option<PurchasedCourse>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection::<PurchasedCourse>()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": update_doc })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Account-deletion cascade: enrollments go dormant, not away.
    pub async fn deactivate_by_student(&self, student_id: &ObjectId) -> Result<u64, AppError> {
        let result = self
            .collection::<PurchasedCourse>()
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

    pub async fn count_by_course(&self, course_id: &ObjectId) -> Result<u64, AppError> {
        self.collection::<PurchasedCourse>()
            .count_documents(doc! { "course_id": course_id, "is_active": true })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count_since(&self, since: mongodb::bson::DateTime) -> Result<u64, AppError> {
        self.collection::<PurchasedCourse>()
            .count_documents(doc! { "created_at": { "$gte": since } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count_all(&self) -> Result<u64, AppError> {
        self.collection::<PurchasedCourse>()
            .count_documents(doc! { "is_active": true })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count_completed(&self) -> Result<u64, AppError> {
        self.collection::<PurchasedCourse>()
            .count_documents(doc! { "is_active": true, "is_completed": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Purchases per calendar month of the given year, for the admin
    /// bar chart. Months with no purchases are absent from the result.
    pub async fn monthly_purchase_counts(&self, year: i32) -> Result<Vec<(u32, u64)>, AppError> {
        let pipeline = vec![
            doc! { "$match": {
                "is_active": true,
                "$expr": { "$eq": [{ "$year": "$purchased_at" }, year] },
            } },
            doc! { "$group": {
                "_id": { "$month": "$purchased_at" },
                "count": { "$sum": 1 },
            } },
            doc! { "$sort": { "_id": 1 } },
        ];

        let mut cursor = self
            .collection::<PurchasedCourse>()
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut months = Vec::new();
        while let Some(row) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
        {
            let month = row.get_i32("_id").unwrap_or(0) as u32;
            let count = row.get_i32("count").unwrap_or(0) as u64;
            months.push((month, count));
        }

        Ok(months)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let pair_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_course_unique".to_string())
                    .build(),
            )
            .build();

        let course_index = IndexModel::builder()
            .keys(doc! { "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("course_id".to_string())
                    .build(),
            )
            .build();

        self.collection::<PurchasedCourse>()
            .create_indexes(vec![pair_index, course_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
