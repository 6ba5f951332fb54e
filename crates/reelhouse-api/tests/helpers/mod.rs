#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod tools;

use axum_test::TestServer;
use reelhouse_api::setup::{build_state, routes::setup_routes};
use reelhouse_api::AppState;
use reelhouse_core::{Config, ServiceConfig};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const PUBLIC_BASE_URL: &str = "http://localhost:8091";
pub const VIDEO_BASE_URL: &str = "https://cdn.test";

/// Returns the API path: `api_path("/videos")` -> `/api/videos`.
pub fn api_path(path: &str) -> String {
    format!("{}{}", reelhouse_api::constants::API_PREFIX, path)
}

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn assets_dir(&self) -> PathBuf {
        self._temp_dir.path().join("assets")
    }

    pub fn videos_dir(&self) -> PathBuf {
        self._temp_dir.path().join("videos")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self._temp_dir.path().join("uploads")
    }

    pub fn database_path(&self) -> PathBuf {
        self._temp_dir.path().join("reelhouse.db")
    }

    /// Make every later write to `column` of `videos` fail, through a second
    /// connection to the same database file.
    pub async fn reject_updates_of(&self, column: &str) {
        let pool = sqlx::SqlitePool::connect(&format!("sqlite://{}", self.database_path().display()))
            .await
            .expect("Failed to open test database");
        sqlx::query(&format!(
            "CREATE TRIGGER reject_{column} BEFORE UPDATE OF {column} ON videos \
             BEGIN SELECT RAISE(ABORT, 'writes to {column} are rejected'); END"
        ))
        .execute(&pool)
        .await
        .expect("Failed to install trigger");
        pool.close().await;
    }

    /// Names of everything left in the upload temp dir.
    pub fn leftover_uploads(&self) -> Vec<String> {
        std::fs::read_dir(self.uploads_dir())
            .expect("upload dir should exist")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }
}

/// Setup a test application with an isolated SQLite file, asset and upload dirs,
/// local video storage and fake media tools.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Same as [`setup_test_app`], with config values replaced by `overrides`.
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = temp_dir.path();
    let tools = tools::fake_tools();

    let mut vars: HashMap<String, String> = HashMap::new();
    let mut set = |key: &str, value: String| {
        vars.insert(key.to_string(), value);
    };
    set("JWT_SECRET", auth::TEST_JWT_SECRET.to_string());
    set(
        "DATABASE_URL",
        format!("sqlite://{}", root.join("reelhouse.db").display()),
    );
    set("ASSETS_ROOT", root.join("assets").display().to_string());
    set("PUBLIC_BASE_URL", PUBLIC_BASE_URL.to_string());
    set("VIDEO_STORAGE_BACKEND", "local".to_string());
    set("LOCAL_VIDEO_PATH", root.join("videos").display().to_string());
    set("LOCAL_VIDEO_BASE_URL", VIDEO_BASE_URL.to_string());
    set("UPLOAD_TMP_DIR", root.join("uploads").display().to_string());
    set("FFPROBE_PATH", tools.probe_cat.display().to_string());
    set("FFMPEG_PATH", tools.ffmpeg_copy.display().to_string());
    for (key, value) in overrides {
        set(key, value.to_string());
    }

    let config: Config = ServiceConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test config")
        .into();

    let state = build_state(&config)
        .await
        .expect("Failed to build application state");
    let router = setup_routes(&config, state.clone()).expect("Failed to set up routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// Wait for `dir` to hold no entries; spawned cleanup runs after the response.
pub async fn wait_until_empty(dir: &Path) -> bool {
    for _ in 0..100 {
        let empty = std::fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true);
        if empty {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
