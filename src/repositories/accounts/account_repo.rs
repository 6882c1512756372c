//! Back-office account data access (admins, tutors, staff).

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
    domain::entities::accounts::account::{Account, Role},
};
use crate::errors::errors::AppError;

#[repository(name = "account", collection = "accounts")]
pub struct AccountRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl AccountRepository {
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let cache_key = format!("account:email:{}", email);

        if let Ok(Some(cached)) = self.redis.get::<Account>(&cache_key).await {
            return Ok(Some(cached));
        }

        let account = self
            .collection::<Account>()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref account) = account {
            let _ = self.redis.set_with_expiry(&cache_key, account, 600).await;
        }

        Ok(account)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<Account>(&cache_key).await {
            return Ok(Some(cached));
        }

        let account = self
            .collection::<Account>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref account) = account {
            let _ = self.redis.set_with_expiry(&cache_key, account, 600).await;
        }

        Ok(account)
    }

    pub async fn find_by_registration_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, AppError> {
        self.collection::<Account>()
            .find_one(doc! { "registration_token": token })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Duplicate registrations are treated as a privilege problem rather
    /// than a validation one, since only admins reach this path.
    pub async fn create(&self, mut account: Account) -> Result<Account, AppError> {
        if self.find_by_email(&account.email).await?.is_some() {
            return Err(AppError::AuthorizationError(
                "An account with this email already exists".to_string(),
            ));
        }

        let result = self
            .collection::<Account>()
            .insert_one(&account)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        account.id = result.inserted_id.as_object_id();

        let _ = self.invalidate_collection_cache(None).await;

        Ok(account)
    }

    pub async fn update(
        &self,
        id: &str,
        update_doc: Document,
    ) -> Result<Option<Account>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection::<Account>()
            .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": update_doc })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref account) = updated {
            let _ = self.invalidate_cache(id).await;
            let _ = self
                .redis
                .del(&format!("account:email:{}", account.email))
                .await;
        }

        Ok(updated)
    }

    pub async fn update_with_unset(
        &self,
        id: &str,
        set_doc: Document,
        unset_fields: &[&str],
    ) -> Result<Option<Account>, AppError> {
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
            .collection::<Account>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": set_doc, "$unset": unset_doc },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref account) = updated {
            let _ = self.invalidate_cache(id).await;
            let _ = self
                .redis
                .del(&format!("account:email:{}", account.email))
                .await;
        }

        Ok(updated)
    }

    pub async fn find_by_role(
        &self,
        role: Role,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Account>, AppError> {
        self.collection::<Account>()
            .find(doc! { "role": role.as_code(), "deleted_at": { "$exists": false } })
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count_by_role(&self, role: Role) -> Result<u64, AppError> {
        self.collection::<Account>()
            .count_documents(doc! { "role": role.as_code(), "deleted_at": { "$exists": false } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<Account>();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1 })
            .options(IndexOptions::builder().name("role".to_string()).build())
            .build();

        collection
            .create_indexes(vec![email_index, role_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
