//! Incremental video encoding through an ffmpeg child process
//!
//! Frames are streamed to ffmpeg's stdin as raw RGB24 and encoded as they
//! arrive, so memory use stays flat regardless of segment length.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};

use crate::application::ports::{SinkError, VideoSink};
use crate::domain::capture::NormalizedFrame;

pub struct FfmpegVideoSink {
    bitrate: u32,
    process: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl FfmpegVideoSink {
    pub fn new(bitrate: u32) -> Self {
        Self {
            bitrate,
            process: None,
            stdin: None,
        }
    }

    fn encode_args(
        path: &Path,
        frame_rate: u32,
        width: u32,
        height: u32,
        bitrate: u32,
    ) -> Vec<String> {
        vec![
            "-f".to_string(),
            "rawvideo".to_string(),
            "-pix_fmt".to_string(),
            "rgb24".to_string(),
            "-s".to_string(),
            format!("{}x{}", width, height),
            "-r".to_string(),
            frame_rate.to_string(),
            "-i".to_string(),
            "-".to_string(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-b:v".to_string(),
            bitrate.to_string(),
            "-y".to_string(),
            path.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl VideoSink for FfmpegVideoSink {
    async fn open(
        &mut self,
        path: &Path,
        frame_rate: u32,
        width: u32,
        height: u32,
    ) -> Result<(), SinkError> {
        if self.process.is_some() {
            return Err(SinkError::OpenFailed("encoder already open".into()));
        }

        let args = Self::encode_args(path, frame_rate, width, height, self.bitrate);
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SinkError::EncoderNotFound("ffmpeg".into())
                } else {
                    SinkError::OpenFailed(e.to_string())
                }
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SinkError::OpenFailed("failed to capture encoder stdin".into()))?;

        self.process = Some(child);
        self.stdin = Some(stdin);
        Ok(())
    }

    async fn write(&mut self, frame: &NormalizedFrame) -> Result<(), SinkError> {
        let stdin = self.stdin.as_mut().ok_or(SinkError::NotOpen)?;
        stdin
            .write_all(frame.data())
            .await
            .map_err(|e| SinkError::WriteFailed(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        let mut child = self.process.take().ok_or(SinkError::NotOpen)?;

        // Closing stdin signals end-of-stream; ffmpeg then finalizes the file
        if let Some(mut stdin) = self.stdin.take() {
            stdin
                .shutdown()
                .await
                .map_err(|e| SinkError::CloseFailed(e.to_string()))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| SinkError::CloseFailed(e.to_string()))?;
        if !status.success() {
            return Err(SinkError::CloseFailed(format!(
                "encoder exited with {}",
                status
            )));
        }
        Ok(())
    }
}
