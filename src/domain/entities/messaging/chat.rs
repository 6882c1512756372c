//! Chat thread between a student and a tutor.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One thread per (tutor, student) pair, enforced by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tutor_id: ObjectId,
    pub student_id: ObjectId,
    #[serde(default)]
    pub message_ids: Vec<ObjectId>,
    /// Unread counters per participant, bumped on send and cleared on read.
    pub tutor_unread_count: u32,
    pub student_unread_count: u32,
    pub is_active: bool,
    pub last_message_at: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Chat {
    pub fn new(tutor_id: ObjectId, student_id: ObjectId) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            tutor_id,
            student_id,
            message_ids: Vec::new(),
            tutor_unread_count: 0,
            student_unread_count: 0,
            is_active: true,
            last_message_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }
}
