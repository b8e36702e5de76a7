//! Microphone input port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::{AudioChunk, AudioFormat};

/// Audio capture errors. All of them are segment-fatal hardware faults
/// from the scheduler's point of view.
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    #[error("No audio input device available")]
    NoDevice,

    #[error("Failed to open audio stream: {0}")]
    OpenFailed(String),

    #[error("Audio stream not open")]
    NotOpen,

    #[error("Failed to read audio chunk: {0}")]
    ReadFailed(String),
}

/// Port for the microphone capture stream.
///
/// `open`/`close` bracket a scoped stream; reads are interleaved with frame
/// grabs at a fixed chunks-per-frame ratio, so one `read_chunk` call blocks
/// for at most a few chunk durations.
#[async_trait]
pub trait AudioInput: Send {
    /// Open the capture stream at the requested format.
    async fn open(&mut self, format: &AudioFormat) -> Result<(), AudioError>;

    /// Block until one full chunk of interleaved PCM samples is available.
    async fn read_chunk(&mut self) -> Result<AudioChunk, AudioError>;

    /// Stop capture and release the stream.
    async fn close(&mut self) -> Result<(), AudioError>;
}
