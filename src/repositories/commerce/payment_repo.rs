//! Payment record data access, keyed by gateway reference.

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
    domain::entities::commerce::payment::Payment,
};
use crate::errors::errors::AppError;

#[repository(name = "payment", collection = "payments")]
pub struct PaymentRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl PaymentRepository {
    pub async fn create(&self, mut payment: Payment) -> Result<Payment, AppError> {
        let result = self
            .collection::<Payment>()
            .insert_one(&payment)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        payment.id = result.inserted_id.as_object_id();
        Ok(payment)
    }

    pub async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>, AppError> {
        self.collection::<Payment>()
            .find_one(doc! { "reference": reference })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn update_by_reference(
        &self,
        reference: &str,
        update_doc: Document,
    ) -> Result<Option<Payment>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection::<Payment>()
            .find_one_and_update(doc! { "reference": reference }, doc! { "$set": update_doc })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_student(&self, student_id: &ObjectId) -> Result<Vec<Payment>, AppError> {
        self.collection::<Payment>()
            .find(doc! { "student_id": student_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_successful_since(
        &self,
        since: mongodb::bson::DateTime,
    ) -> Result<Vec<Payment>, AppError> {
        self.collection::<Payment>()
            .find(doc! { "status": "success", "created_at": { "$gte": since } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Account-deletion cascade: payments stay for the money trail but
    /// lose their student reference.
    pub async fn detach_student(&self, student_id: &ObjectId) -> Result<u64, AppError> {
        let result = self
            .collection::<Payment>()
            .update_many(
                doc! { "student_id": student_id },
                doc! { "$unset": { "student_id": "" } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count)
    }

    /// Lifetime gross revenue across all successful payments.
    pub async fn total_successful_amount(&self) -> Result<f64, AppError> {
        let pipeline = vec![
            doc! { "$match": { "status": "success" } },
            doc! { "$group": { "_id": null, "total": { "$sum": "$amount" } } },
        ];

        let mut cursor = self
            .collection::<Payment>()
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let total = match cursor
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
        {
            Some(row) => row.get_f64("total").unwrap_or(0.0),
            None => 0.0,
        };

        Ok(total)
    }

    pub async fn find_recent_successful(&self, limit: i64) -> Result<Vec<Payment>, AppError> {
        self.collection::<Payment>()
            .find(doc! { "status": "success" })
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let reference_index = IndexModel::builder()
            .keys(doc! { "reference": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("reference_unique".to_string())
                    .build(),
            )
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("student_created".to_string())
                    .build(),
            )
            .build();

        self.collection::<Payment>()
            .create_indexes(vec![reference_index, student_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
