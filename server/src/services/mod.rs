//! Services module - HTTP handlers
//!
//! One sub-module per concern; each handler returns `Result<_, AppError>`.

pub mod admin;
pub mod advertisement;
pub mod auth;
pub mod conversation;
pub mod image;
pub mod user;

pub use admin::{
    ban_user, change_role, delete_listing, list_logs, list_users, record_admin_action, set_vip,
    unban_user, unset_vip,
};
pub use advertisement::{
    create_advertisement, delete_advertisement, get_advertisement, list_advertisements,
    update_advertisement,
};
pub use auth::{login_user, register_user};
pub use conversation::{
    get_conversation_messages, list_conversations, mark_conversation_read, send_message,
    unread_total,
};
pub use image::{get_image, upload_image};
pub use user::{get_me, get_user_by_id, update_me};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
