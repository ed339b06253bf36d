use crate::core::{AppError, AppState};
use crate::entities::{Capability, User};
use crate::repositories::Read;
use axum::extract::State;
use axum::{Error, body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub const TOKEN_TTL_HOURS: i64 = 24;

// content of the jwt token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i32,
    pub nickname: String,
}

#[instrument(skip(secret), fields(nickname = %nickname, id = %id))]
pub fn encode_jwt(nickname: String, id: i32, secret: &str) -> Result<String, Error> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let exp: usize = (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims {
        iat,
        exp,
        nickname,
        id,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        Error::new("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Resolves the bearer token into a `User` and stores it in the request extensions.
/// Banned accounts are stopped here, so no authenticated handler ever sees one.
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let auth_header = match req.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::unauthorized("Invalid authorization header")
        })?,
        None => {
            warn!("Missing authorization header");
            return Err(AppError::unauthorized("Please add the JWT token to the header"));
        }
    };

    let mut parts = auth_header.split_whitespace();
    let token = match (parts.next(), parts.next()) {
        (Some("Bearer"), Some(token)) => token,
        _ => {
            warn!("Authorization header is not a bearer token");
            return Err(AppError::unauthorized("Expected a bearer token"));
        }
    };

    let token_data = decode_jwt(token, &state.jwt_secret)
        .map_err(|_| AppError::unauthorized("Unable to decode token"))?;

    let current_user = match state.user.read(&token_data.claims.id).await? {
        Some(user) => user,
        None => {
            warn!("User not found in database: {}", token_data.claims.id);
            return Err(AppError::unauthorized("You are not an authorized user"));
        }
    };

    if current_user.is_banned {
        warn!("Banned user {} rejected", current_user.user_id);
        return Err(AppError::forbidden("This account is banned"));
    }

    debug!("User authenticated: {}", current_user.nickname);
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Fails with 403 unless `user`'s role grants `capability`
#[instrument(skip(user), fields(user_id = %user.user_id, role = %user.role))]
pub fn require_capability(user: &User, capability: Capability) -> Result<(), AppError> {
    if !user.role.has_capability(capability) {
        warn!("Missing capability {:?}", capability);
        return Err(AppError::forbidden("Insufficient role").with_details(format!(
            "This action requires the {:?} capability",
            capability
        )));
    }
    info!("Capability {:?} granted", capability);
    Ok(())
}

/// Fails with 403 when `target` cannot be acted upon from the admin panel
pub fn guard_target(target: &User) -> Result<(), AppError> {
    if target.role.is_protected() {
        warn!("Admin action on protected user {} rejected", target.user_id);
        return Err(AppError::forbidden("Administrators cannot be targeted"));
    }
    Ok(())
}
