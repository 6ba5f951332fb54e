//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a ready router lives
//! here, so tests can build the same state with their own config.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::JwtService;
use crate::state::{AppState, MediaState};
use anyhow::{Context, Result};
use reelhouse_core::Config;
use reelhouse_db::VideoRepository;
use reelhouse_processing::{FastStartRemuxer, VideoProber};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production());
    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let state = build_state(&config).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Connect the database, storage backends and tool wrappers.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>> {
    let pool = database::setup_database(config).await?;
    let (thumbnails, videos) = storage::setup_storage(config).await?;

    tokio::fs::create_dir_all(config.upload_tmp_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp dir {}",
                config.upload_tmp_dir().display()
            )
        })?;

    let prober =
        VideoProber::new(config.ffprobe_path()).context("Invalid FFPROBE_PATH configuration")?;
    let remuxer =
        FastStartRemuxer::new(config.ffmpeg_path()).context("Invalid FFMPEG_PATH configuration")?;

    let media = MediaState {
        thumbnails,
        videos,
        prober,
        remuxer,
        upload_tmp_dir: config.upload_tmp_dir().clone(),
    };

    Ok(Arc::new(AppState {
        config: config.clone(),
        videos: VideoRepository::new(pool),
        media,
        jwt: JwtService::new(config.jwt_secret(), config.jwt_issuer()),
    }))
}
