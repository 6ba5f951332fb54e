//! Reelhouse Database Layer
//!
//! Repositories over the SQLite metadata store. The schema lives in the
//! workspace `migrations/` directory and is embedded into [`MIGRATOR`].

pub mod db;

pub use db::VideoRepository;

/// Embedded schema migrations, applied on startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
