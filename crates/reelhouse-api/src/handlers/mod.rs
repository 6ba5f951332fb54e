pub mod thumbnail_upload;
pub mod video_upload;
pub mod videos;

use crate::auth::AuthenticatedUser;
use crate::error::HttpAppError;
use crate::state::AppState;
use reelhouse_core::{AppError, Video};
use uuid::Uuid;

pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, HttpAppError> {
    Uuid::parse_str(raw)
        .map_err(|_| HttpAppError(AppError::InvalidInput("Invalid video ID".to_string())))
}

/// The record for `video_id`, provided the caller owns it.
pub(crate) async fn load_owned_video(
    state: &AppState,
    video_id: Uuid,
    user: &AuthenticatedUser,
) -> Result<Video, HttpAppError> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user.user_id) {
        tracing::warn!(
            video_id = %video_id,
            user_id = %user.user_id,
            owner_id = %video.user_id,
            "Rejected access to video owned by another user"
        );
        return Err(AppError::Unauthorized("You don't own this video".to_string()).into());
    }

    Ok(video)
}

/// Lowercased media type with any parameters (`; charset=...`) removed.
pub(crate) fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
