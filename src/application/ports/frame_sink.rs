//! Video encoder sink port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::NormalizedFrame;

/// Encoder/file sink errors
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("Encoder not found: {0}")]
    EncoderNotFound(String),

    #[error("Failed to open sink: {0}")]
    OpenFailed(String),

    #[error("Sink not open")]
    NotOpen,

    #[error("Failed to write to sink: {0}")]
    WriteFailed(String),

    #[error("Failed to finalize sink: {0}")]
    CloseFailed(String),
}

/// Port for the incremental video file encoder.
///
/// Frames are handed over one at a time and persisted immediately; the sink
/// never buffers the clip. `close` must run on every exit path of a segment.
#[async_trait]
pub trait VideoSink: Send {
    /// Open an encoder writing to `path` at the given rate and geometry.
    async fn open(
        &mut self,
        path: &Path,
        frame_rate: u32,
        width: u32,
        height: u32,
    ) -> Result<(), SinkError>;

    /// Append one frame to the output file.
    async fn write(&mut self, frame: &NormalizedFrame) -> Result<(), SinkError>;

    /// Flush and close the output file.
    async fn close(&mut self) -> Result<(), SinkError>;
}
