//! Chat thread data access.

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
    domain::entities::messaging::chat::Chat,
};
use crate::errors::errors::AppError;

#[repository(name = "chat", collection = "chats")]
pub struct ChatRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl ChatRepository {
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Chat>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;

        self.collection::<Chat>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_pair(
        &self,
        tutor_id: &ObjectId,
        student_id: &ObjectId,
    ) -> Result<Option<Chat>, AppError> {
        self.collection::<Chat>()
            .find_one(doc! { "tutor_id": tutor_id, "student_id": student_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut chat: Chat) -> Result<Chat, AppError> {
        let result = self
            .collection::<Chat>()
            .insert_one(&chat)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        chat.id = result.inserted_id.as_object_id();
        Ok(chat)
    }

    /// Appends a message id, bumps the receiver's unread counter and
    /// refreshes the thread timestamp in one write.
    pub async fn record_message(
        &self,
        chat_id: &ObjectId,
        message_id: &ObjectId,
        receiver_is_tutor: bool,
    ) -> Result<(), AppError> {
        let unread_field = if receiver_is_tutor {
            "tutor_unread_count"
        } else {
            "student_unread_count"
        };

        self.collection::<Chat>()
            .update_one(
                doc! { "_id": chat_id },
                doc! {
                    "$push": { "message_ids": message_id },
                    "$inc": { unread_field: 1 },
                    "$set": {
                        "last_message_at": mongodb::bson::DateTime::now(),
                        "updated_at": mongodb::bson::DateTime::now(),
                    },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    pub async fn clear_unread(&self, chat_id: &ObjectId, for_tutor: bool) -> Result<(), AppError> {
        let unread_field = if for_tutor {
            "tutor_unread_count"
        } else {
            "student_unread_count"
        };

        self.collection::<Chat>()
            .update_one(
                doc! { "_id": chat_id },
                doc! { "$set": {
                    unread_field: 0,
                    "updated_at": mongodb::bson::DateTime::now(),
                } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// All threads for one side of the conversation, most recent first.
    pub async fn find_for_participant(
        &self,
        participant_id: &ObjectId,
        is_tutor: bool,
    ) -> Result<Vec<Chat>, AppError> {
        let field = if is_tutor { "tutor_id" } else { "student_id" };

        self.collection::<Chat>()
            .find(doc! { field: participant_id, "is_active": true })
            .sort(doc! { "last_message_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn deactivate_by_student(&self, student_id: &ObjectId) -> Result<u64, AppError> {
        let result = self
            .collection::<Chat>()
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
            .keys(doc! { "tutor_id": 1, "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("tutor_student_unique".to_string())
                    .build(),
            )
            .build();

        self.collection::<Chat>()
            .create_indexes(vec![pair_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
