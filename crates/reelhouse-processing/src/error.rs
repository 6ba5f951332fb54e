use std::path::PathBuf;

use thiserror::Error;

/// Failures from external media tool invocations
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid {tool} path: {reason}")]
    InvalidToolPath { tool: &'static str, reason: String },

    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    InvalidOutput(#[from] serde_json::Error),

    #[error("No streams found in input")]
    NoStreams,

    #[error("First stream has no width/height")]
    MissingDimensions,

    #[error("Remuxed output {} is missing or empty", .0.display())]
    EmptyOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;
