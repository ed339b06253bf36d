//! Conversation DTOs - Data Transfer Objects for conversations

use crate::entities::Conversation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation seen from one participant
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConversationDTO {
    pub conversation_id: i32,
    pub advertisement_id: Option<i32>,
    pub other_user_id: i32,
    pub unread_count: i64,
    pub last_message_id: Option<i32>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ConversationDTO {
    /// `None` when `viewer_id` is not a participant
    pub fn for_viewer(conversation: Conversation, viewer_id: i32) -> Option<Self> {
        let other_user_id = conversation.other_participant(viewer_id)?;
        let unread_count = conversation.unread_for(viewer_id)?;
        Some(Self {
            conversation_id: conversation.conversation_id,
            advertisement_id: conversation.advertisement_id,
            other_user_id,
            unread_count,
            last_message_id: conversation.last_message_id,
            last_message_at: conversation.last_message_at,
            created_at: conversation.created_at,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UnreadTotalDTO {
    pub unread: i64,
}
