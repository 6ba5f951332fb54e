use crate::auth::AuthenticatedUser;
use crate::constants::{VIDEO_FIELD, VIDEO_MEDIA_TYPE};
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_owned_video, media_type_essence, parse_video_id};
use crate::state::{AppState, MediaState};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use reelhouse_core::{AppError, Video};
use reelhouse_storage::keys::video_key;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

const UPLOAD_PREFIX: &str = "reelhouse-upload-";

/// Stream the `video` form field into a temp file in the upload directory.
///
/// The file is removed when the returned handle drops.
async fn receive_video_field(
    media: &MediaState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(NamedTempFile, u64), HttpAppError> {
    let mut multipart = multipart?;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let media_type = field.content_type().map(media_type_essence);
        if media_type.as_deref() != Some(VIDEO_MEDIA_TYPE) {
            return Err(AppError::InvalidInput("Invalid file type, expected video/mp4".to_string()).into());
        }

        let temp = tempfile::Builder::new()
            .prefix(UPLOAD_PREFIX)
            .suffix(".mp4")
            .tempfile_in(&media.upload_tmp_dir)
            .map_err(AppError::from)?;
        let mut file = tokio::fs::File::from_std(temp.reopen().map_err(AppError::from)?);

        let mut written: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await.map_err(AppError::from)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(AppError::from)?;

        return Ok((temp, written));
    }

    Err(AppError::InvalidInput("Unable to get video from form".to_string()).into())
}

#[utoipa::path(
    post,
    path = "/api/video_upload/{video_id}",
    tag = "uploads",
    params(("video_id" = String, Path, description = "Video ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video processed, stored and attached", body = Video),
        (status = 400, description = "Invalid video ID, form or media type", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Video too large", body = ErrorResponse),
        (status = 500, description = "Processing or storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, multipart), fields(video_id = %video_id))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let user = AuthenticatedUser::from_headers(&headers, &state.jwt)?;
    let video_id = parse_video_id(&video_id)?;
    load_owned_video(&state, video_id, &user).await?;

    let start = std::time::Instant::now();
    let (upload, size) = receive_video_field(&state.media, multipart).await?;
    tracing::debug!(size_bytes = size, path = %upload.path().display(), "Video upload received");

    let aspect_ratio = state.media.prober.aspect_ratio(upload.path()).await?;
    let processed = state.media.remuxer.remux(upload.path()).await?;

    let key = video_key(aspect_ratio);
    let url = state
        .media
        .videos
        .upload_file(&key, &processed, VIDEO_MEDIA_TYPE)
        .await?;

    let video = match state.videos.set_video_url(video_id, &url).await {
        Ok(video) => video,
        Err(e) => {
            let storage = state.media.videos.clone();
            tokio::spawn(async move {
                if let Err(err) = storage.delete(&key).await {
                    tracing::warn!(error = %err, key = %key, "Failed to remove orphaned video");
                }
            });
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = %user.user_id,
        size_bytes = size,
        aspect_ratio = %aspect_ratio,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Video uploaded"
    );

    Ok(Json(video))
}
