//! Video record CRUD.

use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{load_owned_video, parse_video_id};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use reelhouse_core::{AppError, CreateVideoRequest, Video};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Draft video created", body = Video),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(user_id = %user.user_id))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<Video>), HttpAppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()).into());
    }

    let draft = Video::new_draft(user.user_id, title.to_string(), request.description);
    let video = state.videos.create_video(&draft).await?;

    tracing::info!(video_id = %video.id, "Video draft created");
    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "The caller's videos, newest first", body = Vec<Video>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Video>>, HttpAppError> {
    let videos = state.videos.list_videos_for_user(user.user_id).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(("video_id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video record", body = Video),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(video_id): Path<String>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = load_owned_video(&state, video_id, &user).await?;
    Ok(Json(video))
}

/// Removes the record only. Stored media is left in place.
#[utoipa::path(
    delete,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(("video_id" = String, Path, description = "Video ID")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(video_id): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    load_owned_video(&state, video_id, &user).await?;

    if !state.videos.delete_video(video_id).await? {
        return Err(AppError::NotFound("Couldn't find video".to_string()).into());
    }

    tracing::info!(video_id = %video_id, "Video deleted");
    Ok(StatusCode::NO_CONTENT)
}
