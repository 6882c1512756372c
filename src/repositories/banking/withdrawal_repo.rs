//! Withdrawal record data access.

use futures_util::TryStreamExt;
use mongodb::{
    IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
};
use singleton_macro::repository;
use std::sync::Arc;

use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::banking::withdrawal::{Withdrawal, WithdrawalStatus},
};
use crate::errors::errors::AppError;

#[repository(name = "withdrawal", collection = "withdrawals")]
pub struct WithdrawalRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl WithdrawalRepository {
    pub async fn create(&self, mut withdrawal: Withdrawal) -> Result<Withdrawal, AppError> {
        let result = self
            .collection::<Withdrawal>()
            .insert_one(&withdrawal)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        withdrawal.id = result.inserted_id.as_object_id();
        Ok(withdrawal)
    }

    pub async fn find_by_tutor(&self, tutor_id: &ObjectId) -> Result<Vec<Withdrawal>, AppError> {
        self.collection::<Withdrawal>()
            .find(doc! { "tutor_id": tutor_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Withdrawal>, AppError> {
        self.collection::<Withdrawal>()
            .find_one(doc! { "transfer_reference": reference })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn update_by_reference(
        &self,
        reference: &str,
        update_doc: Document,
    ) -> Result<Option<Withdrawal>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection::<Withdrawal>()
            .find_one_and_update(
                doc! { "transfer_reference": reference },
                doc! { "$set": update_doc },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Total successfully transferred to a tutor, for balance computation.
    pub async fn total_withdrawn(&self, tutor_id: &ObjectId) -> Result<f64, AppError> {
        let status_bson = mongodb::bson::to_bson(&WithdrawalStatus::Success)
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let withdrawals: Vec<Withdrawal> = self
            .collection::<Withdrawal>()
            .find(doc! { "tutor_id": tutor_id, "status": status_bson })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(withdrawals.iter().map(|w| w.amount).sum())
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let tutor_index = IndexModel::builder()
            .keys(doc! { "tutor_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("tutor_created".to_string())
                    .build(),
            )
            .build();

        let reference_index = IndexModel::builder()
            .keys(doc! { "transfer_reference": 1 })
            .options(
                IndexOptions::builder()
                    .sparse(true)
                    .name("transfer_reference".to_string())
                    .build(),
            )
            .build();

        self.collection::<Withdrawal>()
            .create_indexes(vec![tutor_index, reference_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
