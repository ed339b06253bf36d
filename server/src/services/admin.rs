//! Admin services - Moderation panel
//!
//! Every handler checks a capability first. Handlers that act on a user (or on
//! a listing, whose target is its owner) also refuse protected targets. After
//! a successful mutation the action is appended to the audit log.

use crate::core::{AppError, AppState, guard_target, require_capability};
use crate::dtos::{
    AdminLogDTO, AdvertisementDTO, BanDTO, ChangeRoleDTO, CreateAdminLogDTO, PageQuery, UserDTO,
    UserSearchQuery,
};
use crate::entities::{AdminAction, Advertisement, Capability, User};
use crate::repositories::{Create, Delete, Read};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

/// Best-effort audit append: a failure is reported, never returned
pub async fn record_admin_action(
    state: &AppState,
    admin: &User,
    target_user_id: Option<i32>,
    action: AdminAction,
    details: serde_json::Value,
) {
    let entry = CreateAdminLogDTO {
        admin_id: admin.user_id,
        target_user_id,
        action,
        details,
        created_at: Utc::now(),
    };
    if let Err(e) = state.admin_log.create(&entry).await {
        warn!("Failed to record admin action {:?} by {}: {}", action, admin.user_id, e);
    }
}

async fn load_target(state: &AppState, user_id: i32) -> Result<User, AppError> {
    let target = state
        .user
        .read(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    guard_target(&target)?;
    Ok(target)
}

/// Listing plus its owner, after checking the owner is not protected
async fn load_listing_target(
    state: &AppState,
    advertisement_id: i32,
) -> Result<(Advertisement, User), AppError> {
    let advertisement = state
        .advertisement
        .read(&advertisement_id)
        .await?
        .ok_or_else(|| AppError::not_found("Advertisement not found"))?;
    let owner = load_target(state, advertisement.user_id).await?;
    Ok((advertisement, owner))
}

#[instrument(skip(state, current_user, search, page), fields(admin_id = %current_user.user_id))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(search): Query<UserSearchQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<UserDTO>>, AppError> {
    require_capability(&current_user, Capability::AccessPanel)?;
    let (limit, offset) = page.bounds();
    let users = state.user.list(search.search.as_deref(), limit, offset).await?;
    Ok(Json(users.into_iter().map(UserDTO::from).collect()))
}

#[debug_handler]
#[instrument(skip(state, current_user, body), fields(admin_id = %current_user.user_id, target = %user_id))]
pub async fn ban_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i32>,
    body: Option<Json<BanDTO>>,
) -> Result<Json<UserDTO>, AppError> {
    require_capability(&current_user, Capability::BanUsers)?;
    let body = body.map(|Json(body)| body).unwrap_or_default();
    body.validate()?;
    if user_id == current_user.user_id {
        return Err(AppError::bad_request("You cannot ban yourself"));
    }
    load_target(&state, user_id).await?;

    let banned = state.user.set_banned(user_id, true).await?;
    info!("User banned");

    record_admin_action(
        &state,
        &current_user,
        Some(user_id),
        AdminAction::BanUser,
        json!({ "reason": body.reason }),
    )
    .await;
    Ok(Json(UserDTO::from(banned)))
}

#[instrument(skip(state, current_user), fields(admin_id = %current_user.user_id, target = %user_id))]
pub async fn unban_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserDTO>, AppError> {
    require_capability(&current_user, Capability::BanUsers)?;
    load_target(&state, user_id).await?;

    let unbanned = state.user.set_banned(user_id, false).await?;
    info!("User unbanned");

    record_admin_action(&state, &current_user, Some(user_id), AdminAction::UnbanUser, json!({})).await;
    Ok(Json(UserDTO::from(unbanned)))
}

#[debug_handler]
#[instrument(skip(state, current_user, body), fields(admin_id = %current_user.user_id, target = %user_id, role = %body.role))]
pub async fn change_role(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i32>,
    Json(body): Json<ChangeRoleDTO>,
) -> Result<Json<UserDTO>, AppError> {
    require_capability(&current_user, Capability::ChangeRoles)?;
    let target = load_target(&state, user_id).await?;

    let updated = state.user.set_role(user_id, body.role).await?;
    info!("Role changed from {} to {}", target.role, updated.role);

    record_admin_action(
        &state,
        &current_user,
        Some(user_id),
        AdminAction::ChangeRole,
        json!({ "from": target.role, "to": updated.role }),
    )
    .await;
    Ok(Json(UserDTO::from(updated)))
}

#[instrument(skip(state, current_user), fields(admin_id = %current_user.user_id, advertisement_id = %advertisement_id))]
pub async fn delete_listing(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(advertisement_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_capability(&current_user, Capability::DeleteListings)?;
    let (advertisement, owner) = load_listing_target(&state, advertisement_id).await?;

    state.advertisement.delete(&advertisement_id).await?;
    info!("Listing removed from the admin panel");

    record_admin_action(
        &state,
        &current_user,
        Some(owner.user_id),
        AdminAction::DeleteAdvertisement,
        json!({ "advertisement_id": advertisement_id, "title": advertisement.title }),
    )
    .await;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_vip(
    state: &AppState,
    current_user: &User,
    advertisement_id: i32,
    is_vip: bool,
) -> Result<Json<AdvertisementDTO>, AppError> {
    require_capability(current_user, Capability::ManageVip)?;
    let (_, owner) = load_listing_target(state, advertisement_id).await?;

    let advertisement = state.advertisement.set_vip(advertisement_id, is_vip).await?;
    let action = if is_vip {
        AdminAction::SetVip
    } else {
        AdminAction::UnsetVip
    };

    record_admin_action(
        state,
        current_user,
        Some(owner.user_id),
        action,
        json!({ "advertisement_id": advertisement_id }),
    )
    .await;
    Ok(Json(AdvertisementDTO::from(advertisement)))
}

#[instrument(skip(state, current_user), fields(admin_id = %current_user.user_id, advertisement_id = %advertisement_id))]
pub async fn set_vip(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(advertisement_id): Path<i32>,
) -> Result<Json<AdvertisementDTO>, AppError> {
    toggle_vip(&state, &current_user, advertisement_id, true).await
}

#[instrument(skip(state, current_user), fields(admin_id = %current_user.user_id, advertisement_id = %advertisement_id))]
pub async fn unset_vip(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(advertisement_id): Path<i32>,
) -> Result<Json<AdvertisementDTO>, AppError> {
    toggle_vip(&state, &current_user, advertisement_id, false).await
}

#[instrument(skip(state, current_user, page), fields(admin_id = %current_user.user_id))]
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<AdminLogDTO>>, AppError> {
    require_capability(&current_user, Capability::ViewAuditLog)?;
    let (limit, offset) = page.bounds();
    let logs = state.admin_log.list(limit, offset).await?;
    Ok(Json(logs.into_iter().map(AdminLogDTO::from).collect()))
}
