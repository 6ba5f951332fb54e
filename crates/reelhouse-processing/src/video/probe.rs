use std::path::Path;

use reelhouse_core::AspectRatio;
use serde::Deserialize;
use tokio::process::Command;

use super::validate_tool_path;
use crate::error::{ProcessingError, ProcessingResult};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Runs `ffprobe` against local files.
#[derive(Debug, Clone)]
pub struct VideoProber {
    ffprobe_path: String,
}

impl VideoProber {
    pub fn new(ffprobe_path: impl Into<String>) -> ProcessingResult<Self> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path("ffprobe", &ffprobe_path)?;
        Ok(Self { ffprobe_path })
    }

    /// Width and height of the first stream in the file.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn probe_dimensions(&self, video_path: &Path) -> ProcessingResult<(u32, u32)> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(video_path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessingError::Spawn {
                tool: "ffprobe",
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessingError::ToolFailed {
                tool: "ffprobe",
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let probe: ProbeOutput = serde_json::from_slice(&output.stdout)?;
        let stream = probe.streams.first().ok_or(ProcessingError::NoStreams)?;
        let (width, height) = match (stream.width, stream.height) {
            (Some(w), Some(h)) => (w, h),
            // Audio-only first stream: rejected rather than classified as 0x0.
            _ => return Err(ProcessingError::MissingDimensions),
        };

        tracing::debug!(
            width,
            height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Probed video dimensions"
        );

        Ok((width, height))
    }

    /// Classify the first stream as 16:9, 9:16 or other.
    pub async fn aspect_ratio(&self, video_path: &Path) -> ProcessingResult<AspectRatio> {
        let (width, height) = self.probe_dimensions(video_path).await?;
        Ok(AspectRatio::from_dimensions(width, height))
    }
}
