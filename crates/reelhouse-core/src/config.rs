//! Configuration module
//!
//! Settings are read from the process environment (after loading `.env`) into a
//! [`ServiceConfig`], wrapped by [`Config`] which exposes read-only getters.
//! [`ServiceConfig::from_lookup`] takes any key lookup so tests can build a
//! config without touching the real environment.

use std::env;
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 8091;
const DEFAULT_JWT_ISSUER: &str = "reelhouse-access";
const DEFAULT_DATABASE_URL: &str = "sqlite://reelhouse.db";
const DEFAULT_ASSETS_ROOT: &str = "./assets";
const MIN_JWT_SECRET_LEN: usize = 32;
const MAX_THUMBNAIL_SIZE_BYTES: usize = 10 << 20;
const MAX_VIDEO_SIZE_BYTES: usize = 1 << 30;
const DB_MAX_CONNECTIONS: u32 = 10;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    // Auth
    pub jwt_secret: String,
    pub jwt_issuer: String,
    // Metadata store
    pub database_url: String,
    pub db_max_connections: u32,
    // Thumbnails
    pub assets_root: PathBuf,
    pub public_base_url: String,
    pub max_thumbnail_size_bytes: usize,
    // Video storage
    pub video_storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_cf_distribution: Option<String>,
    pub local_video_path: Option<PathBuf>,
    pub local_video_base_url: Option<String>,
    pub max_video_size_bytes: usize,
    // Media tools
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub upload_tmp_dir: PathBuf,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().http_concurrency_limit
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().jwt_secret
    }

    pub fn jwt_issuer(&self) -> &str {
        &self.inner().jwt_issuer
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn assets_root(&self) -> &PathBuf {
        &self.inner().assets_root
    }

    pub fn public_base_url(&self) -> &str {
        &self.inner().public_base_url
    }

    /// Base URL under which thumbnails are served, e.g. `http://localhost:8091/assets`.
    pub fn assets_base_url(&self) -> String {
        format!("{}/assets", self.public_base_url().trim_end_matches('/'))
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.inner().max_thumbnail_size_bytes
    }

    pub fn video_storage_backend(&self) -> StorageBackend {
        self.inner().video_storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn s3_cf_distribution(&self) -> Option<&str> {
        self.inner().s3_cf_distribution.as_deref()
    }

    pub fn local_video_path(&self) -> Option<&PathBuf> {
        self.inner().local_video_path.as_ref()
    }

    pub fn local_video_base_url(&self) -> Option<&str> {
        self.inner().local_video_base_url.as_deref()
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.inner().max_video_size_bytes
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    pub fn upload_tmp_dir(&self) -> &PathBuf {
        &self.inner().upload_tmp_dir
    }
}

impl From<ServiceConfig> for Config {
    fn from(config: ServiceConfig) -> Self {
        Config(Box::new(config))
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port: u16 = match get("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let video_storage_backend = match get("VIDEO_STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let config = ServiceConfig {
            server_port,
            environment,
            cors_origins,
            http_concurrency_limit: get("HTTP_CONCURRENCY_LIMIT")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            jwt_secret: get("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_issuer: get("JWT_ISSUER").unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_string()),
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DB_MAX_CONNECTIONS),
            assets_root: PathBuf::from(
                get("ASSETS_ROOT").unwrap_or_else(|| DEFAULT_ASSETS_ROOT.to_string()),
            ),
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{}", server_port)),
            max_thumbnail_size_bytes: get("MAX_THUMBNAIL_SIZE_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_THUMBNAIL_SIZE_BYTES),
            video_storage_backend,
            s3_bucket: get("S3_BUCKET"),
            s3_region: get("S3_REGION").or_else(|| get("AWS_REGION")),
            s3_endpoint: get("S3_ENDPOINT"),
            s3_cf_distribution: get("S3_CF_DISTRIBUTION")
                .map(|url| url.trim_end_matches('/').to_string()),
            local_video_path: get("LOCAL_VIDEO_PATH").map(PathBuf::from),
            local_video_base_url: get("LOCAL_VIDEO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            max_video_size_bytes: get("MAX_VIDEO_SIZE_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_VIDEO_SIZE_BYTES),
            ffmpeg_path: get("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            ffprobe_path: get("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            upload_tmp_dir: get("UPLOAD_TMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if !self.database_url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a SQLite connection string (sqlite://...)"
            ));
        }

        match self.video_storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_video_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_VIDEO_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_video_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_VIDEO_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
