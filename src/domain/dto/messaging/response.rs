use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::messaging::chat::Chat;
use crate::domain::entities::messaging::message::{Message, ParticipantKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub tutor_id: String,
    pub student_id: String,
    pub tutor_unread_count: u32,
    pub student_unread_count: u32,
    pub last_message_at: DateTime,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id.map(|id| id.to_hex()).unwrap_or_default(),
            tutor_id: chat.tutor_id.to_hex(),
            student_id: chat.student_id.to_hex(),
            tutor_unread_count: chat.tutor_unread_count,
            student_unread_count: chat.student_unread_count,
            last_message_at: chat.last_message_at,
        }
    }
}

/// Someone the caller can start a chat with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub sender_kind: ParticipantKind,
    pub receiver_id: String,
    pub receiver_kind: ParticipantKind,
    pub course_id: Option<String>,
    pub body: String,
    pub created_at: DateTime,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.map(|id| id.to_hex()).unwrap_or_default(),
            chat_id: message.chat_id.to_hex(),
            sender_id: message.sender_id.to_hex(),
            sender_kind: message.sender_kind,
            receiver_id: message.receiver_id.to_hex(),
            receiver_kind: message.receiver_kind,
            course_id: message.course_id.map(|id| id.to_hex()),
            body: message.body,
            created_at: message.created_at,
        }
    }
}
