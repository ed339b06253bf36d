//! Image services - Upload and download of listing pictures

use crate::core::{AppError, AppState};
use crate::dtos::ImageDTO;
use crate::entities::User;
use crate::media::content_type_for;
use axum::{
    Extension,
    body::Bytes,
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{info, instrument};

#[instrument(skip(state, current_user, headers, body), fields(user_id = %current_user.user_id, len = body.len()))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ImageDTO>), AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let stored = state.images.save(&body, &content_type).await?;
    info!("Image uploaded as {}", stored.name);

    Ok((
        StatusCode::CREATED,
        Json(ImageDTO {
            url: stored.url,
            content_type: content_type_for(&stored.name)
                .unwrap_or_default()
                .to_string(),
            size: body.len(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state
        .images
        .read(&name)
        .await?
        .ok_or_else(|| AppError::not_found("Image not found"))?;
    let content_type = content_type_for(&name).unwrap_or("application/octet-stream");
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}
