//! Cart line-item data access.

use futures_util::TryStreamExt;
use mongodb::{
    IndexModel,
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
};
use singleton_macro::repository;
use std::sync::Arc;

use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::commerce::cart_item::{CartItem, CartStatus},
};
use crate::errors::errors::AppError;

#[repository(name = "cart", collection = "cart_items")]
pub struct CartRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl CartRepository {
    pub async fn create(&self, mut item: CartItem) -> Result<CartItem, AppError> {
        let result = self
            .collection::<CartItem>()
            .insert_one(&item)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        item.id = result.inserted_id.as_object_id();
        Ok(item)
    }

    /// Open rows only. `Success` rows are dropped once the webhook settles
    /// them, so they never reappear in the cart.
    pub async fn find_open_by_student(
        &self,
        student_id: &ObjectId,
    ) -> Result<Vec<CartItem>, AppError> {
        self.collection::<CartItem>()
            .find(doc! {
                "student_id": student_id,
                "status": { "$in": ["pending", "initiated"] },
            })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_open_item(
        &self,
        student_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<Option<CartItem>, AppError> {
        self.collection::<CartItem>()
            .find_one(doc! {
                "student_id": student_id,
                "course_id": course_id,
                "status": { "$in": ["pending", "initiated"] },
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Any row for the pair, regardless of status.
    pub async fn find_item(
        &self,
        student_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<Option<CartItem>, AppError> {
        self.collection::<CartItem>()
            .find_one(doc! { "student_id": student_id, "course_id": course_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn adjust_quantity(&self, id: &ObjectId, delta: i32) -> Result<u64, AppError> {
        let result = self
            .collection::<CartItem>()
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$inc": { "quantity": delta },
                    "$set": { "updated_at": mongodb::bson::DateTime::now() },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count)
    }

    pub async fn delete_by_id(&self, id: &ObjectId) -> Result<u64, AppError> {
        let result = self
            .collection::<CartItem>()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count)
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<CartItem>, AppError> {
        self.collection::<CartItem>()
            .find(doc! { "_id": { "$in": ids } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Stamps the gateway reference on every row entering checkout.
    pub async fn mark_initiated(
        &self,
        ids: &[ObjectId],
        reference: &str,
    ) -> Result<u64, AppError> {
        let result = self
            .collection::<CartItem>()
            .update_many(
                doc! { "_id": { "$in": ids } },
                doc! { "$set": {
                    "status": "initiated",
                    "payment_reference": reference,
                    "updated_at": mongodb::bson::DateTime::now(),
                } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count)
    }

    pub async fn mark_status_by_reference(
        &self,
        reference: &str,
        status: CartStatus,
    ) -> Result<u64, AppError> {
        let status_bson = mongodb::bson::to_bson(&status)
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let result = self
            .collection::<CartItem>()
            .update_many(
                doc! { "payment_reference": reference },
                doc! { "$set": {
                    "status": status_bson,
                    "updated_at": mongodb::bson::DateTime::now(),
                } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count)
    }

    /// Removes the settled rows once their enrollments exist.
    pub async fn delete_succeeded_for_student(
        &self,
        student_id: &ObjectId,
    ) -> Result<u64, AppError> {
        let result = self
            .collection::<CartItem>()
            .delete_many(doc! { "student_id": student_id, "status": "success" })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_status".to_string())
                    .build(),
            )
            .build();

        let reference_index = IndexModel::builder()
            .keys(doc! { "payment_reference": 1 })
            .options(
                IndexOptions::builder()
                    .sparse(true)
                    .name("payment_reference".to_string())
                    .build(),
            )
            .build();

        self.collection::<CartItem>()
            .create_indexes(vec![student_index, reference_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
