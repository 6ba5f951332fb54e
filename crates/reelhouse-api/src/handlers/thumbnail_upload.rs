use crate::auth::AuthenticatedUser;
use crate::constants::{THUMBNAIL_FIELD, THUMBNAIL_MEDIA_TYPES};
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_owned_video, media_type_essence, parse_video_id};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use axum::body::Bytes;
use reelhouse_core::{AppError, Video};
use reelhouse_storage::keys::thumbnail_key;
use std::sync::Arc;

/// Content type and bytes of the `thumbnail` form field.
async fn read_thumbnail_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(Option<String>, Bytes), HttpAppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        return Ok((content_type, data));
    }

    Err(AppError::InvalidInput("Unable to get image from form".to_string()).into())
}

/// `(media type, extension)` for an accepted thumbnail content type.
fn thumbnail_media_type(content_type: Option<&str>) -> Result<(&'static str, &'static str), AppError> {
    let essence = content_type.map(media_type_essence).unwrap_or_default();
    if essence.is_empty() {
        return Err(AppError::InvalidInput("Media type not specified".to_string()));
    }

    THUMBNAIL_MEDIA_TYPES
        .iter()
        .find(|(media_type, _)| *media_type == essence)
        .copied()
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Invalid media type {}: thumbnails must be image/png or image/jpeg",
                essence
            ))
        })
}

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{video_id}",
    tag = "uploads",
    params(("video_id" = String, Path, description = "Video ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored and attached", body = Video),
        (status = 400, description = "Invalid video ID, form or media type", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Thumbnail too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, multipart), fields(video_id = %video_id))]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user = AuthenticatedUser::from_headers(&headers, &state.jwt)?;

    let (content_type, data) = read_thumbnail_field(multipart).await?;
    let (media_type, extension) = thumbnail_media_type(content_type.as_deref())?;

    load_owned_video(&state, video_id, &user).await?;

    let key = thumbnail_key(extension);
    let size = data.len();
    let url = state
        .media
        .thumbnails
        .upload_with_key(&key, data.to_vec(), media_type)
        .await?;

    let video = match state.videos.set_thumbnail_url(video_id, &url).await {
        Ok(video) => video,
        Err(e) => {
            let storage = state.media.thumbnails.clone();
            tokio::spawn(async move {
                if let Err(err) = storage.delete(&key).await {
                    tracing::warn!(error = %err, key = %key, "Failed to remove orphaned thumbnail");
                }
            });
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = %user.user_id,
        size_bytes = size,
        media_type,
        "Thumbnail uploaded"
    );

    Ok(Json(video))
}
