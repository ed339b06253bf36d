//! Conversation entity - Canonical user pair, optionally scoped to an advertisement

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Conversation {
    pub conversation_id: i32,
    // always user1_id < user2_id
    pub user1_id: i32,
    pub user2_id: i32,
    pub advertisement_id: Option<i32>,
    pub last_message_id: Option<i32>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub user1_unread: i64,
    pub user2_unread: i64,
    pub created_at: DateTime<Utc>,
}

/// Which of the two canonical columns a participant occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    /// Unread counter column owned by this slot
    pub fn unread_column(&self) -> &'static str {
        match self {
            Slot::First => "user1_unread",
            Slot::Second => "user2_unread",
        }
    }
}

/// Lookup key of a conversation: the ordered pair plus the optional advertisement.
///
/// `ConversationKey::new(a, b, ad) == ConversationKey::new(b, a, ad)` for any `a`, `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub user1_id: i32,
    pub user2_id: i32,
    pub advertisement_id: Option<i32>,
}

impl ConversationKey {
    pub fn new(a: i32, b: i32, advertisement_id: Option<i32>) -> Self {
        let (user1_id, user2_id) = if a <= b { (a, b) } else { (b, a) };
        Self {
            user1_id,
            user2_id,
            advertisement_id,
        }
    }

    pub fn slot_of(&self, user_id: i32) -> Option<Slot> {
        if user_id == self.user1_id {
            Some(Slot::First)
        } else if user_id == self.user2_id {
            Some(Slot::Second)
        } else {
            None
        }
    }
}

impl Conversation {
    pub fn key(&self) -> ConversationKey {
        ConversationKey {
            user1_id: self.user1_id,
            user2_id: self.user2_id,
            advertisement_id: self.advertisement_id,
        }
    }

    pub fn is_participant(&self, user_id: i32) -> bool {
        self.key().slot_of(user_id).is_some()
    }

    pub fn other_participant(&self, user_id: i32) -> Option<i32> {
        match self.key().slot_of(user_id)? {
            Slot::First => Some(self.user2_id),
            Slot::Second => Some(self.user1_id),
        }
    }

    pub fn unread_for(&self, user_id: i32) -> Option<i64> {
        match self.key().slot_of(user_id)? {
            Slot::First => Some(self.user1_unread),
            Slot::Second => Some(self.user2_unread),
        }
    }
}
