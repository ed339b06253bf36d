//! Core Module - Infrastructure components of the application
//!
//! - Authentication, JWT and the capability gate
//! - Configuration
//! - Error handling
//! - Application state and conversation locks

pub mod auth;
pub mod config;
pub mod error;
pub mod locks;
pub mod state;

pub use auth::{
    Claims, authentication_middleware, decode_jwt, encode_jwt, guard_target, require_capability,
};
pub use config::Config;
pub use error::AppError;
pub use locks::ConversationLocks;
pub use state::AppState;
