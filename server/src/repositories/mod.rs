//! Repositories module - One repository per table
//!
//! Every repository owns a clone of the `SqlitePool` and returns
//! `Result<_, sqlx::Error>`; services turn those errors into `AppError`.
//!
//! Queries use the runtime-checked `sqlx::query` / `sqlx::query_as` with
//! `FromRow` entities, so building the crate never needs a live database.

pub mod admin_log;
pub mod advertisement;
pub mod conversation;
pub mod message;
pub mod traits;
pub mod user;

pub use traits::{Create, Delete, Read, Update};

pub use admin_log::AdminLogRepository;
pub use advertisement::AdvertisementRepository;
pub use conversation::ConversationRepository;
pub use message::MessageRepository;
pub use user::UserRepository;
