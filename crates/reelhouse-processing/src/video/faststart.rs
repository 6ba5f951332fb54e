use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::process::Command;

use super::validate_tool_path;
use crate::error::{ProcessingError, ProcessingResult};

const OUTPUT_SUFFIX: &str = ".processing";

/// Remuxes MP4 uploads with `-movflags faststart` without re-encoding.
#[derive(Debug, Clone)]
pub struct FastStartRemuxer {
    ffmpeg_path: String,
}

/// `{input}.processing`, next to the input file.
pub fn processing_path(input: &Path) -> PathBuf {
    let mut name: OsString = input.as_os_str().to_owned();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

impl FastStartRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>) -> ProcessingResult<Self> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path("ffmpeg", &ffmpeg_path)?;
        Ok(Self { ffmpeg_path })
    }

    /// Write a fast-start copy of `input` to `{input}.processing`.
    ///
    /// The returned [`TempPath`] deletes the output when dropped. On failure no
    /// output is left behind.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    pub async fn remux(&self, input: &Path) -> ProcessingResult<TempPath> {
        let start = std::time::Instant::now();
        // Owns the output from here on, so every early return removes it.
        let output_path = TempPath::from_path(processing_path(input));

        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&*output_path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessingError::Spawn {
                tool: "ffmpeg",
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessingError::ToolFailed {
                tool: "ffmpeg",
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let size = match tokio::fs::metadata(&*output_path).await {
            Ok(meta) if meta.is_file() && meta.len() > 0 => meta.len(),
            _ => return Err(ProcessingError::EmptyOutput(output_path.to_path_buf())),
        };

        tracing::debug!(
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Remuxed video for fast start"
        );

        Ok(output_path)
    }
}
