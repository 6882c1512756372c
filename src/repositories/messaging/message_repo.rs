//! Chat message data access.

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
    domain::entities::messaging::message::Message,
};
use crate::errors::errors::AppError;

#[repository(name = "message", collection = "messages")]
pub struct MessageRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl MessageRepository {
    pub async fn create(&self, mut message: Message) -> Result<Message, AppError> {
        let result = self
            .collection::<Message>()
            .insert_one(&message)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        message.id = result.inserted_id.as_object_id();
        Ok(message)
    }

    /// Thread history in chronological order.
    pub async fn find_by_chat(
        &self,
        chat_id: &ObjectId,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Message>, AppError> {
        self.collection::<Message>()
            .find(doc! { "chat_id": chat_id, "is_active": true })
            .sort(doc! { "created_at": 1 })
            .skip(skip)
            .limit(limit)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn deactivate_by_sender(&self, sender_id: &ObjectId) -> Result<u64, AppError> {
        let result = self
            .collection::<Message>()
            .update_many(
                doc! { "sender_id": sender_id },
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
        let chat_index = IndexModel::builder()
            .keys(doc! { "chat_id": 1, "created_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("chat_created".to_string())
                    .build(),
            )
            .build();

        self.collection::<Message>()
            .create_indexes(vec![chat_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
