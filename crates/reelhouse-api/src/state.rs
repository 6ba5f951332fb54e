//! Application state shared by every handler.
//!
//! Media backends and tool wrappers are grouped in [`MediaState`] so upload handlers
//! read from one place; the repository and token service sit beside it.

use crate::auth::JwtService;
use reelhouse_core::Config;
use reelhouse_db::VideoRepository;
use reelhouse_processing::{FastStartRemuxer, VideoProber};
use reelhouse_storage::Storage;
use std::path::PathBuf;
use std::sync::Arc;

/// Storage backends and external tool wrappers.
#[derive(Clone)]
pub struct MediaState {
    /// Disk-backed, served under `/assets`.
    pub thumbnails: Arc<dyn Storage>,
    /// Local disk or S3, per `VIDEO_STORAGE_BACKEND`.
    pub videos: Arc<dyn Storage>,
    pub prober: VideoProber,
    pub remuxer: FastStartRemuxer,
    pub upload_tmp_dir: PathBuf,
}

/// Main application state.
#[derive(Clone)]
pub struct AppState {
    /// Consulted per request by [`crate::error::expose_error_details`].
    pub config: Config,
    pub videos: VideoRepository,
    pub media: MediaState,
    pub jwt: JwtService,
}
