//! Reelhouse API Library
//!
//! HTTP handlers, authentication and application setup for the video hosting API.

// Module declarations
mod api_doc;
mod handlers;

// Public modules
pub mod auth;
pub mod constants;
pub mod error;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
