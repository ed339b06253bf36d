//! Auth services - Login and registration

use crate::core::auth::TOKEN_TTL_HOURS;
use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{CreateUserDTO, LoginDTO, UserDTO};
use crate::entities::User;
use crate::repositories::Create;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(nickname = %body.nickname))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Look up the user by nickname; unknown nickname and bad password share one answer
    // 2. Banned accounts cannot log in
    // 3. Issue the JWT, both as Authorization header and HttpOnly cookie
    let user = match state.user.find_by_nickname(&body.nickname).await? {
        Some(user) if user.verify_password(&body.password) => user,
        _ => {
            warn!("Login failed");
            return Err(AppError::unauthorized("Nickname or password are not correct."));
        }
    };

    if user.is_banned {
        warn!("Banned user tried to log in");
        return Err(AppError::forbidden("This account is banned"));
    }

    let token = encode_jwt(user.nickname.clone(), user.user_id, &state.jwt_secret)?;

    let cookie_value = format!(
        "token={}; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        token,
        TOKEN_TTL_HOURS * 60 * 60
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie_value)
            .map_err(|_| AppError::internal_server_error("Failed to build cookie"))?,
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("Failed to build token header"))?,
    );

    info!("User {} logged in", user.user_id);
    Ok((StatusCode::OK, headers, Json(UserDTO::from(user))))
}

#[instrument(skip(state, body), fields(nickname = %body.nickname))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserDTO>,
) -> Result<(StatusCode, Json<UserDTO>), AppError> {
    body.validate()?;

    if state.user.find_by_nickname(&body.nickname).await?.is_some() {
        return Err(AppError::conflict("Nickname already exists"));
    }

    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    let new_user = CreateUserDTO {
        nickname: body.nickname,
        password: password_hash,
    };

    // a concurrent registration of the same nickname still ends in 409 through the unique index
    let created_user = state.user.create(&new_user).await?;
    info!("User {} registered", created_user.user_id);

    Ok((StatusCode::CREATED, Json(UserDTO::from(created_user))))
}
