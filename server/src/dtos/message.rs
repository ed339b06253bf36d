//! Message DTOs - Data Transfer Objects for messages

use crate::entities::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    pub message_id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            message_id: value.message_id,
            conversation_id: value.conversation_id,
            sender_id: value.sender_id,
            receiver_id: value.receiver_id,
            content: value.content,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

/// Body of `POST /messages`. The sender comes from the token, the conversation
/// is resolved by the server.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SendMessageDTO {
    pub receiver_id: i32,
    pub advertisement_id: Option<i32>,

    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    pub content: String,
}

/// Insert DTO for a message (no message_id, no conversation_id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateMessageDTO {
    pub sender_id: i32,
    pub receiver_id: i32,
    pub advertisement_id: Option<i32>,

    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    pub content: String,

    pub created_at: DateTime<Utc>,
}

impl CreateMessageDTO {
    pub fn from_request(sender_id: i32, body: SendMessageDTO) -> Self {
        Self {
            sender_id,
            receiver_id: body.receiver_id,
            advertisement_id: body.advertisement_id,
            content: body.content,
            created_at: Utc::now(),
        }
    }
}

/// Result of marking a conversation as read
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MarkReadDTO {
    pub conversation_id: i32,
    pub messages_marked: u64,
    pub unread_count: i64,
}
