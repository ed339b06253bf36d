//! AdminLog entity - Immutable audit record of a privileged action

use super::enums::AdminAction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct AdminLog {
    pub log_id: i32,
    pub admin_id: i32,
    pub target_user_id: Option<i32>,
    pub action: AdminAction,
    pub details: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
