//! Reelhouse Core Library
//!
//! Domain models, error types and configuration shared by every Reelhouse crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

pub use config::{Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AspectRatio, CreateVideoRequest, Video};
pub use storage_types::StorageBackend;
