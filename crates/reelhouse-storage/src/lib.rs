//! Reelhouse Storage Library
//!
//! Storage abstraction plus the local-disk and S3-compatible backends.
//!
//! # Storage key format
//!
//! - **Thumbnails**: `{name}.{ext}` at the root of the assets directory
//! - **Videos**: `{aspect_prefix}/{name}.mp4`, where the prefix is `landscape`, `portrait` or `other`
//!
//! `name` is always 32 random bytes in unpadded base64url. Keys must not contain
//! `..` or a leading `/`. Key generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_video_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use reelhouse_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
