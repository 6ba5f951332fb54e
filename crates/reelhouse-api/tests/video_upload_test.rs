mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use helpers::auth::bearer;
use helpers::fixtures::{
    create_test_video, reload_video, LANDSCAPE_PROBE, NO_STREAMS_PROBE, PNG_BYTES,
    PORTRAIT_PROBE, SQUARE_PROBE,
};
use helpers::tools::fake_tools;
use helpers::{api_path, setup_test_app, setup_test_app_with, wait_until_empty, VIDEO_BASE_URL};
use reelhouse_core::Video;
use std::time::Duration;
use uuid::Uuid;

fn video_form(data: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(Bytes::copy_from_slice(data.as_bytes()))
            .file_name("clip.mp4")
            .mime_type(mime_type),
    )
}

fn upload_path(video_id: impl std::fmt::Display) -> String {
    api_path(&format!("/video_upload/{}", video_id))
}

#[tokio::test]
async fn test_upload_landscape_video() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = create_test_video(&app, user_id).await;

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(LANDSCAPE_PROBE, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 200);
    let updated: Video = response.json();
    let url = updated.video_url.clone().expect("video_url should be set");
    let prefix = format!("{}/landscape/", VIDEO_BASE_URL);
    assert!(url.starts_with(&prefix), "unexpected url {url}");
    assert!(url.ends_with(".mp4"));

    // The fake remuxer copies its input, so the stored object is the upload itself
    let key = url.trim_start_matches(&format!("{}/", VIDEO_BASE_URL));
    let stored = std::fs::read_to_string(app.videos_dir().join(key)).unwrap();
    assert_eq!(stored, LANDSCAPE_PROBE);

    assert_eq!(reload_video(&app, video.id).await.unwrap(), updated);
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn test_aspect_ratio_picks_prefix() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();

    for (probe, prefix) in [(PORTRAIT_PROBE, "portrait"), (SQUARE_PROBE, "other")] {
        let video = create_test_video(&app, user_id).await;
        let response = app
            .client()
            .post(&upload_path(video.id))
            .add_header("Authorization", bearer(user_id))
            .multipart(video_form(probe, "video/mp4"))
            .await;

        assert_eq!(response.status_code(), 200);
        let updated: Video = response.json();
        let expected = format!("{}/{}/", VIDEO_BASE_URL, prefix);
        assert!(updated.video_url.unwrap().starts_with(&expected));
    }
}

#[tokio::test]
async fn test_wrong_media_type_is_rejected() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = create_test_video(&app, user_id).await;

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(LANDSCAPE_PROBE, "video/quicktime"))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(reload_video(&app, video.id).await.unwrap().video_url.is_none());
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn test_non_owner_is_rejected() {
    let app = setup_test_app().await;
    let video = create_test_video(&app, Uuid::new_v4()).await;

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(video_form(LANDSCAPE_PROBE, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 401);
    assert!(reload_video(&app, video.id).await.unwrap().video_url.is_none());
}

#[tokio::test]
async fn test_missing_video_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&upload_path(Uuid::new_v4()))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(video_form(LANDSCAPE_PROBE, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_token_is_checked_before_id() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&upload_path("not-a-uuid"))
        .multipart(video_form(LANDSCAPE_PROBE, "video/mp4"))
        .await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .client()
        .post(&upload_path("not-a-uuid"))
        .add_header("Authorization", bearer(Uuid::new_v4()))
        .multipart(video_form(LANDSCAPE_PROBE, "video/mp4"))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_probe_failure_leaves_record_untouched() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = create_test_video(&app, user_id).await;

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(NO_STREAMS_PROBE, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MEDIA_PROCESSING_ERROR");
    assert!(reload_video(&app, video.id).await.unwrap().video_url.is_none());
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn test_remux_failure_cleans_up() {
    let broken = fake_tools().failing.display().to_string();
    let app = setup_test_app_with(&[("FFMPEG_PATH", broken.as_str())]).await;
    let user_id = Uuid::new_v4();
    let video = create_test_video(&app, user_id).await;

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(LANDSCAPE_PROBE, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(reload_video(&app, video.id).await.unwrap().video_url.is_none());
    assert!(app.leftover_uploads().is_empty());
    assert!(!app.videos_dir().join("landscape").exists());
}

#[tokio::test]
async fn test_oversized_video_is_rejected() {
    let app = setup_test_app_with(&[("MAX_VIDEO_SIZE_BYTES", "1024")]).await;
    let user_id = Uuid::new_v4();
    let video = create_test_video(&app, user_id).await;

    let payload = "x".repeat(8 * 1024);
    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(&payload, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(reload_video(&app, video.id).await.unwrap().video_url.is_none());
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn test_storage_failure_leaves_record_untouched() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = create_test_video(&app, user_id).await;

    // A plain file where the prefix directory belongs makes the store fail.
    std::fs::write(app.videos_dir().join("landscape"), b"").unwrap();

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(LANDSCAPE_PROBE, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert_eq!(reload_video(&app, video.id).await.unwrap(), video);
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn test_failed_record_update_removes_stored_video() {
    let app = setup_test_app().await;
    let user_id = Uuid::new_v4();
    let video = create_test_video(&app, user_id).await;
    app.reject_updates_of("video_url").await;

    let response = app
        .client()
        .post(&upload_path(video.id))
        .add_header("Authorization", bearer(user_id))
        .multipart(video_form(LANDSCAPE_PROBE, "video/mp4"))
        .await;

    assert_eq!(response.status_code(), 500);
    assert!(reload_video(&app, video.id).await.unwrap().video_url.is_none());
    assert!(
        wait_until_empty(&app.videos_dir().join("landscape")).await,
        "stored video should be removed after the record update fails"
    );
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn test_thumbnail_during_video_processing_is_kept() {
    let slow = fake_tools().ffmpeg_slow.display().to_string();
    let app = setup_test_app_with(&[("FFMPEG_PATH", slow.as_str())]).await;
    let user_id = Uuid::new_v4();
    let video = create_test_video(&app, user_id).await;

    let video_upload = async {
        app.client()
            .post(&upload_path(video.id))
            .add_header("Authorization", bearer(user_id))
            .multipart(video_form(LANDSCAPE_PROBE, "video/mp4"))
            .await
    };
    // Lands while the remux is still running.
    let thumbnail_upload = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        app.client()
            .post(&api_path(&format!("/thumbnail_upload/{}", video.id)))
            .add_header("Authorization", bearer(user_id))
            .multipart(MultipartForm::new().add_part(
                "thumbnail",
                Part::bytes(Bytes::from_static(PNG_BYTES))
                    .file_name("thumb.png")
                    .mime_type("image/png"),
            ))
            .await
    };

    let (video_response, thumbnail_response) = tokio::join!(video_upload, thumbnail_upload);
    assert_eq!(thumbnail_response.status_code(), 200);
    assert_eq!(video_response.status_code(), 200);

    let stored = reload_video(&app, video.id).await.unwrap();
    assert!(stored.thumbnail_url.is_some(), "thumbnail URL was overwritten");
    assert!(stored.video_url.is_some());
    assert_eq!(video_response.json::<Video>(), stored);
}
