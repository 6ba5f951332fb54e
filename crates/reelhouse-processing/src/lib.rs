//! Reelhouse Processing Library
//!
//! Thin wrappers around the external media tools. `ffprobe` reports stream
//! dimensions for aspect-ratio classification and `ffmpeg` remuxes uploads so
//! the `moov` atom sits at the front of the file for progressive playback.
//!
//! Tools run through `tokio::process` and are killed if the calling future is dropped.

pub mod error;
pub mod video;

pub use error::{ProcessingError, ProcessingResult};
pub use video::{FastStartRemuxer, VideoProber};
