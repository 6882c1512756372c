//! Chat message entity.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Which side of a chat a participant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantKind {
    Student,
    Tutor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub chat_id: ObjectId,
    pub sender_id: ObjectId,
    pub sender_kind: ParticipantKind,
    pub receiver_id: ObjectId,
    pub receiver_kind: ParticipantKind,
    /// Course the conversation is about, when started from a course page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<ObjectId>,
    pub body: String,
    pub is_active: bool,
    pub created_at: DateTime,
}

impl Message {
    pub fn new(
        chat_id: ObjectId,
        sender_id: ObjectId,
        sender_kind: ParticipantKind,
        receiver_id: ObjectId,
        receiver_kind: ParticipantKind,
        body: String,
    ) -> Self {
        Self {
            id: None,
            chat_id,
            sender_id,
            sender_kind,
            receiver_id,
            receiver_kind,
            course_id: None,
            body,
            is_active: true,
            created_at: DateTime::now(),
        }
    }
}
