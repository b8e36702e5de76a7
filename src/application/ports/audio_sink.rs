//! Audio file sink port interface

use std::path::Path;

use crate::domain::capture::{AudioChunk, AudioFormat};

use super::frame_sink::SinkError;

/// Port for the PCM container writer.
///
/// Chunks accumulate for the duration of one segment and are serialized
/// once, at `finalize`. `finalize` must run on every exit path, including
/// early termination, so partial segments still yield a playable file.
pub trait AudioSink: Send {
    /// Start accumulating for a new file at `path`.
    fn open(&mut self, path: &Path, format: &AudioFormat) -> Result<(), SinkError>;

    /// Buffer one chunk of interleaved PCM samples.
    fn append(&mut self, chunk: AudioChunk) -> Result<(), SinkError>;

    /// Serialize everything accumulated since `open` and close the file.
    fn finalize(&mut self) -> Result<(), SinkError>;
}
