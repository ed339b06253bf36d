//! Advertisement services - Public listing and owner CRUD

use crate::core::{AppError, AppState};
use crate::dtos::{
    AdvertisementDTO, AdvertisementFilter, CreateAdvertisementDTO, NewAdvertisementDTO,
    UpdateAdvertisementDTO,
};
use crate::entities::advertisement::has_contact;
use crate::entities::{Advertisement, User};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

async fn load_owned(
    state: &AppState,
    advertisement_id: i32,
    current_user: &User,
) -> Result<Advertisement, AppError> {
    let advertisement = state
        .advertisement
        .read(&advertisement_id)
        .await?
        .ok_or_else(|| AppError::not_found("Advertisement not found"))?;

    if advertisement.user_id != current_user.user_id {
        warn!("User {} is not the owner of advertisement {}", current_user.user_id, advertisement_id);
        return Err(AppError::forbidden("Only the owner can modify this advertisement"));
    }
    Ok(advertisement)
}

#[instrument(skip(state, filter))]
pub async fn list_advertisements(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<AdvertisementFilter>,
) -> Result<Json<Vec<AdvertisementDTO>>, AppError> {
    let advertisements = state.advertisement.list(&filter).await?;
    Ok(Json(advertisements.into_iter().map(AdvertisementDTO::from).collect()))
}

#[instrument(skip(state), fields(advertisement_id = %advertisement_id))]
pub async fn get_advertisement(
    State(state): State<Arc<AppState>>,
    Path(advertisement_id): Path<i32>,
) -> Result<Json<AdvertisementDTO>, AppError> {
    let advertisement = state
        .advertisement
        .read(&advertisement_id)
        .await?
        .ok_or_else(|| AppError::not_found("Advertisement not found"))?;
    Ok(Json(AdvertisementDTO::from(advertisement)))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_advertisement(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateAdvertisementDTO>,
) -> Result<(StatusCode, Json<AdvertisementDTO>), AppError> {
    // 1. Validate the body, including the contact rule
    // 2. Bind it to the caller and normalise blank handles to NULL
    // 3. Insert; VIP always starts off
    body.validate()?;
    let new_advertisement = NewAdvertisementDTO::from_request(current_user.user_id, body);
    let advertisement = state.advertisement.create(&new_advertisement).await?;

    Ok((StatusCode::CREATED, Json(AdvertisementDTO::from(advertisement))))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id, advertisement_id = %advertisement_id))]
pub async fn update_advertisement(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(advertisement_id): Path<i32>,
    Json(body): Json<UpdateAdvertisementDTO>,
) -> Result<Json<AdvertisementDTO>, AppError> {
    body.validate()?;
    let current = load_owned(&state, advertisement_id, &current_user).await?;

    if body.is_empty() {
        debug!("Empty update, returning advertisement unchanged");
        return Ok(Json(AdvertisementDTO::from(current)));
    }

    let (telegram, discord) = body.merged_contacts(&current);
    if !has_contact(telegram.as_deref(), discord.as_deref()) {
        return Err(AppError::bad_request("At least one of telegram or discord is required"));
    }

    let updated = state.advertisement.update(&advertisement_id, &body).await?;
    info!("Advertisement updated");
    Ok(Json(AdvertisementDTO::from(updated)))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, advertisement_id = %advertisement_id))]
pub async fn delete_advertisement(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(advertisement_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    load_owned(&state, advertisement_id, &current_user).await?;
    state.advertisement.delete(&advertisement_id).await?;
    info!("Advertisement deleted by its owner");
    Ok(StatusCode::NO_CONTENT)
}
