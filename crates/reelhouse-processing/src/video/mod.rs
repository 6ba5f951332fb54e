mod faststart;
mod probe;

pub use faststart::FastStartRemuxer;
pub use probe::VideoProber;

use crate::error::{ProcessingError, ProcessingResult};

/// Reject tool paths that could smuggle shell syntax or traverse directories.
fn validate_tool_path(tool: &'static str, path: &str) -> ProcessingResult<()> {
    let invalid = |reason: &str| ProcessingError::InvalidToolPath {
        tool,
        reason: reason.to_string(),
    };

    if path.is_empty() {
        return Err(invalid("path is empty"));
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(invalid("contains dangerous characters"));
    }

    if path.contains("..") {
        return Err(invalid("contains directory traversal"));
    }

    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '\\' | ':'))
    {
        return Err(invalid("contains unsafe characters"));
    }

    Ok(())
}
