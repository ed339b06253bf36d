//! Message entity - A direct message inside a conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub message_id: i32,
    // set by the server while resolving the conversation, never by the sender
    pub conversation_id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: String,
    pub is_read: bool,
    // ISO 8601 on the wire, parsed into UTC by serde
    pub created_at: DateTime<Utc>,
}
