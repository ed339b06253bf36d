//! AdminLogRepository - Append-only audit trail
//!
//! Only `Create` is implemented; the table also refuses UPDATE and DELETE.

use super::Create;
use crate::dtos::CreateAdminLogDTO;
use crate::entities::AdminLog;
use sqlx::types::Json;
use sqlx::{Error, SqlitePool};
use tracing::instrument;

pub struct AdminLogRepository {
    connection_pool: SqlitePool,
}

impl AdminLogRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<AdminLog>, Error> {
        sqlx::query_as::<_, AdminLog>(
            "SELECT * FROM admin_logs ORDER BY created_at DESC, log_id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<AdminLog, CreateAdminLogDTO> for AdminLogRepository {
    #[instrument(skip(self, data), fields(admin_id = %data.admin_id, action = ?data.action))]
    async fn create(&self, data: &CreateAdminLogDTO) -> Result<AdminLog, Error> {
        sqlx::query_as::<_, AdminLog>(
            r#"
            INSERT INTO admin_logs (admin_id, target_user_id, action, details, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(data.admin_id)
        .bind(data.target_user_id)
        .bind(data.action)
        .bind(Json(&data.details))
        .bind(data.created_at)
        .fetch_one(&self.connection_pool)
        .await
    }
}
