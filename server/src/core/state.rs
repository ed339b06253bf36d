//! Application State - Shared state of the application
//!
//! Holds the repositories, the JWT secret, the conversation locks and the image store.

use crate::core::locks::ConversationLocks;
use crate::media::ImageStore;
use crate::repositories::{
    AdminLogRepository, AdvertisementRepository, ConversationRepository, MessageRepository,
    UserRepository,
};
use sqlx::SqlitePool;
use std::path::PathBuf;

/// Global state shared by every route and middleware
pub struct AppState {
    pub user: UserRepository,

    pub advertisement: AdvertisementRepository,

    pub conversation: ConversationRepository,

    pub msg: MessageRepository,

    /// Append-only audit trail
    pub admin_log: AdminLogRepository,

    /// Secret key for JWT tokens
    pub jwt_secret: String,

    /// Serializes conversation resolution per (pair, advertisement)
    pub conversation_locks: ConversationLocks,

    pub images: ImageStore,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt_secret: String, upload_dir: PathBuf) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            advertisement: AdvertisementRepository::new(pool.clone()),
            conversation: ConversationRepository::new(pool.clone()),
            msg: MessageRepository::new(pool.clone()),
            admin_log: AdminLogRepository::new(pool),
            jwt_secret,
            conversation_locks: ConversationLocks::new(),
            images: ImageStore::new(upload_dir),
        }
    }
}
