use super::TestApp;
use reelhouse_core::Video;
use uuid::Uuid;

pub const LANDSCAPE_PROBE: &str =
    r#"{"streams":[{"codec_type":"video","width":1920,"height":1080},{"codec_type":"audio"}]}"#;
pub const PORTRAIT_PROBE: &str = r#"{"streams":[{"codec_type":"video","width":1080,"height":1920}]}"#;
pub const SQUARE_PROBE: &str = r#"{"streams":[{"codec_type":"video","width":800,"height":600}]}"#;
pub const NO_STREAMS_PROBE: &str = r#"{"streams":[]}"#;

/// PNG signature followed by a few bytes; the server never decodes it.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

/// Insert a draft video owned by `user_id` directly through the repository.
pub async fn create_test_video(app: &TestApp, user_id: Uuid) -> Video {
    let draft = Video::new_draft(
        user_id,
        "Boots and Cats".to_string(),
        "A test video".to_string(),
    );
    app.state
        .videos
        .create_video(&draft)
        .await
        .expect("Failed to create test video")
}

/// The stored record, straight from the database.
pub async fn reload_video(app: &TestApp, video_id: Uuid) -> Option<Video> {
    app.state
        .videos
        .get_video(video_id)
        .await
        .expect("Failed to load video")
}
