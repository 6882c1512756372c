//! Tutor bank account data access.

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
    domain::entities::banking::bank_account::BankAccount,
};
use crate::errors::errors::AppError;

#[repository(name = "bankaccount", collection = "bank_accounts")]
pub struct BankAccountRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl BankAccountRepository {
    pub async fn create(&self, mut account: BankAccount) -> Result<BankAccount, AppError> {
        let existing = self
            .collection::<BankAccount>()
            .find_one(doc! { "account_number": &account.account_number })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if existing.is_some() {
            return Err(AppError::ConflictError(
                "This account number is already registered".to_string(),
            ));
        }

        let result = self
            .collection::<BankAccount>()
            .insert_one(&account)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        account.id = result.inserted_id.as_object_id();
        Ok(account)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<BankAccount>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        self.collection::<BankAccount>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_tutor(&self, tutor_id: &ObjectId) -> Result<Vec<BankAccount>, AppError> {
        self.collection::<BankAccount>()
            .find(doc! { "tutor_id": tutor_id, "is_active": true })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn deactivate(&self, tutor_id: &ObjectId, id: &str) -> Result<bool, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let result = self
            .collection::<BankAccount>()
            .update_one(
                doc! { "_id": object_id, "tutor_id": tutor_id },
                doc! { "$set": {
                    "is_active": false,
                    "updated_at": mongodb::bson::DateTime::now(),
                } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count > 0)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let number_index = IndexModel::builder()
            .keys(doc! { "account_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("account_number_unique".to_string())
                    .build(),
            )
            .build();

        let tutor_index = IndexModel::builder()
            .keys(doc! { "tutor_id": 1 })
            .options(IndexOptions::builder().name("tutor_id".to_string()).build())
            .build();

        self.collection::<BankAccount>()
            .create_indexes(vec![number_index, tutor_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
