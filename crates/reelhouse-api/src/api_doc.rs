//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use reelhouse_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelhouse API",
        version = "0.1.0",
        description = "Video hosting API. Create a video record, then attach a thumbnail and an MP4 upload to it. Every endpoint except the health check expects an `Authorization: Bearer <token>` header."
    ),
    paths(
        health::liveness_check,
        handlers::videos::create_video,
        handlers::videos::list_videos,
        handlers::videos::get_video,
        handlers::videos::delete_video,
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_upload::upload_video,
    ),
    components(
        schemas(
            models::Video,
            models::CreateVideoRequest,
            models::AspectRatio,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness checks"),
        (name = "videos", description = "Video record management"),
        (name = "uploads", description = "Thumbnail and video uploads"),
    )
)]
pub struct ApiDoc;

pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
