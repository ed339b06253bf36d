//! Admin DTOs - Data Transfer Objects for the admin panel

use crate::entities::{AdminAction, AdminLog, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminLogDTO {
    pub log_id: i32,
    pub admin_id: i32,
    pub target_user_id: Option<i32>,
    pub action: AdminAction,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<AdminLog> for AdminLogDTO {
    fn from(value: AdminLog) -> Self {
        Self {
            log_id: value.log_id,
            admin_id: value.admin_id,
            target_user_id: value.target_user_id,
            action: value.action,
            details: value.details.0,
            created_at: value.created_at,
        }
    }
}

/// Insert DTO for the audit log
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateAdminLogDTO {
    pub admin_id: i32,
    pub target_user_id: Option<i32>,
    pub action: AdminAction,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChangeRoleDTO {
    pub role: UserRole,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct BanDTO {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}
