//! User services - Profiles

use crate::core::{AppError, AppState};
use crate::dtos::{UpdateUserDTO, UserDTO};
use crate::entities::User;
use crate::repositories::{Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

#[instrument(skip(current_user), fields(user_id = %current_user.user_id))]
pub async fn get_me(Extension(current_user): Extension<User>) -> Json<UserDTO> {
    Json(UserDTO::from(current_user))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<UpdateUserDTO>,
) -> Result<Json<UserDTO>, AppError> {
    body.validate()?;

    if let Some(nickname) = &body.nickname {
        if let Some(existing) = state.user.find_by_nickname(nickname).await? {
            if existing.user_id != current_user.user_id {
                return Err(AppError::conflict("Nickname already exists"));
            }
        }
    }

    let password = match &body.password {
        Some(password) => Some(
            User::hash_password(password)
                .map_err(|_| AppError::internal_server_error("Failed to hash password"))?,
        ),
        None => None,
    };

    let update = UpdateUserDTO {
        nickname: body.nickname,
        password,
    };
    let updated = state.user.update(&current_user.user_id, &update).await?;
    info!("Profile updated");

    Ok(Json(UserDTO::from(updated)))
}

#[instrument(skip(state), fields(user_id = %user_id))]
pub async fn get_user_by_id(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserDTO>, AppError> {
    debug!("Fetching user by ID");
    let user = state
        .user
        .read(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(UserDTO::from(user)))
}
