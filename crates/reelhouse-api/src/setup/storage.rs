//! Storage backend setup

use anyhow::{Context, Result};
use reelhouse_core::Config;
use reelhouse_storage::{create_video_storage, LocalStorage, Storage};
use std::sync::Arc;

/// Thumbnail storage (always local, under `ASSETS_ROOT`) and the configured video storage.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Arc<dyn Storage>)> {
    let thumbnails = LocalStorage::new(config.assets_root().clone(), config.assets_base_url())
        .await
        .context("Failed to initialize thumbnail storage")?;

    let videos = create_video_storage(config)
        .await
        .context("Failed to initialize video storage")?;

    tracing::info!(
        assets_root = %config.assets_root().display(),
        video_backend = %videos.backend_type(),
        "Storage initialized"
    );

    Ok((Arc::new(thumbnails), videos))
}
