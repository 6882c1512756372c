//! Tutor-student messaging request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Receiver id is required"))]
    pub receiver_id: String,

    #[validate(length(min = 1, max = 5000, message = "Message body is required"))]
    pub body: String,

    /// Course the conversation is about, when started from a course page.
    pub course_id: Option<String>,
}

/// Get-or-create a chat thread with the other participant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenChatRequest {
    #[validate(length(min = 1, message = "Participant id is required"))]
    pub participant_id: String,
}

/// Query string for the websocket endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsQuery {
    #[serde(rename = "chatId")]
    pub chat_id: String,
}
