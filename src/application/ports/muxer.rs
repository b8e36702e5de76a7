//! Container muxer port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Mux errors. Reported per segment; the raw video and audio artifacts are
/// always left intact, and later segments still run.
#[derive(Debug, Clone, Error)]
pub enum MuxError {
    #[error("Muxer not found: {0}")]
    MuxerNotFound(String),

    #[error("Mux input missing: {0}")]
    InputMissing(String),

    #[error("Mux failed: {0}")]
    MuxFailed(String),
}

/// Port for the container-level combine: video stream copied without
/// re-encoding, audio transcoded to the container's codec.
#[async_trait]
pub trait Muxer: Send {
    /// Combine a finished video file and audio file into one container.
    async fn remux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError>;
}
