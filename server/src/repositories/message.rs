//! MessageRepository - Message history and the send unit of work

use super::{ConversationRepository, Read};
use crate::dtos::CreateMessageDTO;
use crate::entities::{ConversationKey, Message};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Stores a message and keeps its conversation consistent, in one transaction:
    ///
    /// 1. create the conversation for (pair, advertisement) if missing
    /// 2. load it
    /// 3. insert the message with that conversation id
    /// 4. move `last_message_*` and increment the receiver's unread counter
    ///
    /// Callers resolving the same key concurrently must hold the key's
    /// `ConversationLocks` entry; the unique index catches anything that slips past.
    #[instrument(skip(self, data), fields(sender = %data.sender_id, receiver = %data.receiver_id))]
    pub async fn create_in_conversation(&self, data: &CreateMessageDTO) -> Result<Message, Error> {
        let key = ConversationKey::new(data.sender_id, data.receiver_id, data.advertisement_id);
        // sender == receiver is rejected upstream, and by the CHECK on the table
        let receiver_slot = key.slot_of(data.receiver_id).ok_or(Error::RowNotFound)?;

        // begins with a write so the transaction takes the write lock up front
        let mut tx = self.connection_pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO conversations
                (user1_id, user2_id, advertisement_id, user1_unread, user2_unread, created_at)
            VALUES (?, ?, ?, 0, 0, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(key.user1_id)
        .bind(key.user2_id)
        .bind(key.advertisement_id)
        .bind(data.created_at)
        .execute(&mut *tx)
        .await?;

        let conversation = ConversationRepository::find_by_key(&mut *tx, &key)
            .await?
            .ok_or(Error::RowNotFound)?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, receiver_id, content, is_read, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            RETURNING *
            "#,
        )
        .bind(conversation.conversation_id)
        .bind(data.sender_id)
        .bind(data.receiver_id)
        .bind(&data.content)
        .bind(data.created_at)
        .fetch_one(&mut *tx)
        .await?;

        let column = receiver_slot.unread_column();
        let bump = format!(
            "UPDATE conversations SET last_message_id = ?, last_message_at = ?, {column} = {column} + 1 \
             WHERE conversation_id = ?"
        );
        sqlx::query(&bump)
            .bind(message.message_id)
            .bind(message.created_at)
            .bind(conversation.conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            "Message {} stored in conversation {}",
            message.message_id, conversation.conversation_id
        );
        Ok(message)
    }

    /// Newest first, `limit` messages strictly older than `before_date` when given
    #[instrument(skip(self))]
    pub async fn find_many_paginated(
        &self,
        conversation_id: i32,
        before_date: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        let messages = match before_date {
            Some(before) => {
                sqlx::query_as::<_, Message>(
                    r#"
                    SELECT * FROM messages
                    WHERE conversation_id = ? AND created_at < ?
                    ORDER BY created_at DESC, message_id DESC
                    LIMIT ?
                    "#,
                )
                .bind(conversation_id)
                .bind(before)
                .bind(limit)
                .fetch_all(&self.connection_pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Message>(
                    r#"
                    SELECT * FROM messages
                    WHERE conversation_id = ?
                    ORDER BY created_at DESC, message_id DESC
                    LIMIT ?
                    "#,
                )
                .bind(conversation_id)
                .bind(limit)
                .fetch_all(&self.connection_pool)
                .await?
            }
        };
        debug!("Loaded {} messages", messages.len());
        Ok(messages)
    }
}

impl Read<Message, i32> for MessageRepository {
    async fn read(&self, id: &i32) -> Result<Option<Message>, Error> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE message_id = ?")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}
