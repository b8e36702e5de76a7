//! Audio/video remuxing through ffmpeg

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{MuxError, Muxer};

/// Lines of encoder stderr kept in a mux failure message
const STDERR_TAIL_LINES: usize = 6;

/// Combines a segment's video and WAV artifacts into one container.
/// The video stream is copied bit-exact; only the audio is re-encoded.
pub struct FfmpegMuxer;

impl FfmpegMuxer {
    pub fn new() -> Self {
        Self
    }

    fn mux_args(video: &Path, audio: &Path, output: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-i".to_string(),
            audio.to_string_lossy().to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-y".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    fn stderr_tail(stderr: &[u8]) -> String {
        let text = String::from_utf8_lossy(stderr);
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
        lines[start..].join("\n")
    }
}

impl Default for FfmpegMuxer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    async fn remux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError> {
        if !video.exists() {
            return Err(MuxError::InputMissing(video.display().to_string()));
        }
        if !audio.exists() {
            return Err(MuxError::InputMissing(audio.display().to_string()));
        }

        let result = Command::new("ffmpeg")
            .args(Self::mux_args(video, audio, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MuxError::MuxerNotFound("ffmpeg".into())
                } else {
                    MuxError::MuxFailed(e.to_string())
                }
            })?;

        if !result.status.success() {
            return Err(MuxError::MuxFailed(Self::stderr_tail(&result.stderr)));
        }
        Ok(())
    }
}
