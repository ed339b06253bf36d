//! ConversationRepository - Conversation reads and the mark-read unit of work

use super::Read;
use crate::entities::{Conversation, ConversationKey, Slot};
use sqlx::{Error, Executor, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

pub struct ConversationRepository {
    connection_pool: SqlitePool,
}

impl ConversationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Conversation for a key. `IS` makes "no advertisement" match NULL.
    ///
    /// Takes any executor so the send path can run it inside its transaction.
    #[instrument(skip(executor))]
    pub async fn find_by_key<'e, E>(executor: E, key: &ConversationKey) -> Result<Option<Conversation>, Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations \
             WHERE user1_id = ? AND user2_id = ? AND advertisement_id IS ?",
        )
        .bind(key.user1_id)
        .bind(key.user2_id)
        .bind(key.advertisement_id)
        .fetch_optional(executor)
        .await
    }

    /// Conversations of a user, most recent activity first
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Conversation>, Error> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
            WHERE user1_id = ? OR user2_id = ?
            ORDER BY COALESCE(last_message_at, created_at) DESC, conversation_id DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;
        debug!("User is part of {} conversations", conversations.len());
        Ok(conversations)
    }

    /// Sum of the user's own counter slots
    pub async fn unread_total(&self, user_id: i32) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(CASE WHEN user1_id = ? THEN user1_unread ELSE user2_unread END), 0)
            FROM conversations
            WHERE user1_id = ? OR user2_id = ?
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_one(&self.connection_pool)
        .await
    }

    /// Flips every unread message addressed to `reader_id` and zeroes the
    /// reader's counter, both or neither. Returns the number of messages flipped.
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        conversation_id: i32,
        reader_id: i32,
        slot: Slot,
    ) -> Result<u64, Error> {
        let mut tx = self.connection_pool.begin().await?;

        let flipped = sqlx::query(
            "UPDATE messages SET is_read = 1 \
             WHERE conversation_id = ? AND receiver_id = ? AND is_read = 0",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let reset = format!(
            "UPDATE conversations SET {} = 0 WHERE conversation_id = ?",
            slot.unread_column()
        );
        let result = sqlx::query(&reset)
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        tx.commit().await?;
        info!("Marked {} messages as read", flipped);
        Ok(flipped)
    }
}

impl Read<Conversation, i32> for ConversationRepository {
    async fn read(&self, id: &i32) -> Result<Option<Conversation>, Error> {
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE conversation_id = ?")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}
