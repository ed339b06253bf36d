//! Entities module - Domain entities
//!
//! Every entity maps one table of the database.

pub mod admin_log;
pub mod advertisement;
pub mod conversation;
pub mod enums;
pub mod message;
pub mod user;

// Re-exports for shorter imports
pub use admin_log::AdminLog;
pub use advertisement::Advertisement;
pub use conversation::{Conversation, ConversationKey, Slot};
pub use enums::{AdminAction, Capability, UserRole};
pub use message::Message;
pub use user::User;
