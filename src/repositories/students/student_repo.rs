//! Student data access with Redis read-through caching.
//!
//! Single-document reads are cached for ten minutes; any write invalidates
//! the touched keys so stale profile data never outlives an update.

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
    domain::entities::students::student::Student,
};
use crate::errors::errors::AppError;

#[repository(name = "student", collection = "students")]
pub struct StudentRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl StudentRepository {
    /// Cache key: `student:email:{email}`, 600s TTL.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Student>, AppError> {
        let cache_key = format!("student:email:{}", email);

        if let Ok(Some(cached)) = self.redis.get::<Student>(&cache_key).await {
            return Ok(Some(cached));
        }

        let student = self
            .collection::<Student>()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref student) = student {
            let _ = self.redis.set_with_expiry(&cache_key, student, 600).await;
        }

        Ok(student)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Student>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<Student>(&cache_key).await {
            return Ok(Some(cached));
        }

        let student = self
            .collection::<Student>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref student) = student {
            let _ = self.redis.set_with_expiry(&cache_key, student, 600).await;
        }

        Ok(student)
    }

    /// Verification tokens are single-use, so this read skips the cache.
    pub async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Student>, AppError> {
        self.collection::<Student>()
            .find_one(doc! { "verification_token": token })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut student: Student) -> Result<Student, AppError> {
        if self.find_by_email(&student.email).await?.is_some() {
            return Err(AppError::ValidationError(
                "An account with this email already exists".to_string(),
            ));
        }

        let result = self
            .collection::<Student>()
            .insert_one(&student)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        student.id = result.inserted_id.as_object_id();

        let _ = self.invalidate_collection_cache(None).await;

        Ok(student)
    }

    pub async fn update(
        &self,
        id: &str,
        update_doc: Document,
    ) -> Result<Option<Student>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection::<Student>()
            .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": update_doc })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref student) = updated {
            let _ = self.invalidate_cache(id).await;
            let _ = self
                .redis
                .del(&format!("student:email:{}", student.email))
                .await;
        }

        Ok(updated)
    }

    /// Clears single-use fields alongside a `$set`. Used to consume
    /// verification tokens and reset PINs.
    pub async fn update_with_unset(
        &self,
        id: &str,
        set_doc: Document,
        unset_fields: &[&str],
    ) -> Result<Option<Student>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let mut unset_doc = Document::new();
        for field in unset_fields {
            unset_doc.insert(*field, "");
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection::<Student>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": set_doc, "$unset": unset_doc },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref student) = updated {
            let _ = self.invalidate_cache(id).await;
            let _ = self
                .redis
                .del(&format!("student:email:{}", student.email))
                .await;
        }

        Ok(updated)
    }

    pub async fn find_all(&self, skip: u64, limit: i64) -> Result<Vec<Student>, AppError> {
        self.collection::<Student>()
            .find(doc! { "deleted_at": { "$exists": false } })
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Batch lookup used when stitching names onto aggregates.
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Student>, AppError> {
        self.collection::<Student>()
            .find(doc! { "_id": { "$in": ids } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.collection::<Student>()
            .count_documents(doc! { "deleted_at": { "$exists": false } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count_since(&self, since: mongodb::bson::DateTime) -> Result<u64, AppError> {
        self.collection::<Student>()
            .count_documents(doc! { "created_at": { "$gte": since } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<Student>();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        collection
            .create_indexes(vec![email_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
