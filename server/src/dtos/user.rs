//! User DTOs - Data Transfer Objects for users

use crate::entities::{User, UserRole};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref NICKNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap();
}

/// Public view of a user, never carries the password hash
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDTO {
    pub user_id: i32,
    pub nickname: String,
    pub role: UserRole,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            user_id: value.user_id,
            nickname: value.nickname,
            role: value.role,
            is_banned: value.is_banned,
            created_at: value.created_at,
        }
    }
}

/// Registration body; also the insert DTO once the password is hashed
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDTO {
    #[validate(
        length(min = 3, max = 32, message = "Nickname must be between 3 and 32 characters"),
        regex(path = *NICKNAME_RE, message = "Nickname may only contain letters, digits, '_', '.' and '-'")
    )]
    pub nickname: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
}

/// Login body
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginDTO {
    pub nickname: String,
    pub password: String,
}

/// Self-service profile update; role and ban flag are not reachable from here
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateUserDTO {
    #[validate(
        length(min = 3, max = 32, message = "Nickname must be between 3 and 32 characters"),
        regex(path = *NICKNAME_RE, message = "Nickname may only contain letters, digits, '_', '.' and '-'")
    )]
    pub nickname: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: Option<String>,
}
