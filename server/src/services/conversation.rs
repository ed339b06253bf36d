//! Conversation services - Inbox, history, read state and sending

use crate::core::{AppError, AppState};
use crate::dtos::{
    ConversationDTO, CreateMessageDTO, MarkReadDTO, MessageDTO, MessagesQuery, SendMessageDTO,
    UnreadTotalDTO,
};
use crate::entities::{Conversation, ConversationKey, User};
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

pub const MESSAGES_PAGE_SIZE: i64 = 50;

async fn load_as_participant(
    state: &AppState,
    conversation_id: i32,
    current_user: &User,
) -> Result<Conversation, AppError> {
    let conversation = state
        .conversation
        .read(&conversation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Conversation not found"))?;

    if !conversation.is_participant(current_user.user_id) {
        warn!("User {} is not part of conversation {}", current_user.user_id, conversation_id);
        return Err(AppError::forbidden("You are not part of this conversation"));
    }
    Ok(conversation)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<ConversationDTO>>, AppError> {
    let conversations = state.conversation.list_for_user(current_user.user_id).await?;
    let dtos = conversations
        .into_iter()
        .filter_map(|c| ConversationDTO::for_viewer(c, current_user.user_id))
        .collect::<Vec<_>>();
    Ok(Json(dtos))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn unread_total(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<UnreadTotalDTO>, AppError> {
    let unread = state.conversation.unread_total(current_user.user_id).await?;
    Ok(Json(UnreadTotalDTO { unread }))
}

#[instrument(skip(state, current_user, params), fields(user_id = %current_user.user_id, conversation_id = %conversation_id))]
pub async fn get_conversation_messages(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(conversation_id): Path<i32>,
    Query(params): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    load_as_participant(&state, conversation_id, &current_user).await?;

    let messages = state
        .msg
        .find_many_paginated(conversation_id, params.before_date, MESSAGES_PAGE_SIZE)
        .await?;
    debug!("Returning {} messages", messages.len());
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, conversation_id = %conversation_id))]
pub async fn mark_conversation_read(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(conversation_id): Path<i32>,
) -> Result<Json<MarkReadDTO>, AppError> {
    let conversation = load_as_participant(&state, conversation_id, &current_user).await?;
    let slot = conversation
        .key()
        .slot_of(current_user.user_id)
        .ok_or_else(|| AppError::forbidden("You are not part of this conversation"))?;

    let messages_marked = state
        .conversation
        .mark_read(conversation_id, current_user.user_id, slot)
        .await?;

    Ok(Json(MarkReadDTO {
        conversation_id,
        messages_marked,
        unread_count: 0,
    }))
}

#[instrument(skip(state, current_user, body), fields(sender = %current_user.user_id, receiver = %body.receiver_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<SendMessageDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    // 1. Validate content and reject messages to oneself
    // 2. Receiver and advertisement must exist
    // 3. Under the key's lock, store the message and update the conversation in one transaction
    body.validate()?;

    if body.receiver_id == current_user.user_id {
        return Err(AppError::bad_request("You cannot send a message to yourself"));
    }

    state
        .user
        .read(&body.receiver_id)
        .await?
        .ok_or_else(|| AppError::not_found("Receiver not found"))?;

    if let Some(advertisement_id) = body.advertisement_id {
        state
            .advertisement
            .read(&advertisement_id)
            .await?
            .ok_or_else(|| AppError::not_found("Advertisement not found"))?;
    }

    let key = ConversationKey::new(current_user.user_id, body.receiver_id, body.advertisement_id);
    let new_message = CreateMessageDTO::from_request(current_user.user_id, body);

    let message = {
        let _guard = state.conversation_locks.acquire(key).await;
        state.msg.create_in_conversation(&new_message).await?
    };

    info!("Message {} sent in conversation {}", message.message_id, message.conversation_id);
    Ok((StatusCode::CREATED, Json(MessageDTO::from(message))))
}
