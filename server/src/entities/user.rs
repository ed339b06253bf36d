//! User entity - User account with password helpers

use super::enums::UserRole;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: i32,
    pub nickname: String,
    pub password: String,
    pub role: UserRole,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(password, DEFAULT_COST)?;
        Ok(hash)
    }
}
