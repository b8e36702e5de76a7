//! WAV persistence using hound

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::application::ports::{AudioSink, SinkError};
use crate::domain::capture::{AudioChunk, AudioFormat, SAMPLE_WIDTH_BYTES};

/// Streams 16-bit PCM chunks into a WAV file; the header is fixed up when
/// the writer finalizes, so an unfinalized file is not a valid artifact.
pub struct HoundAudioSink {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
}

impl HoundAudioSink {
    pub fn new() -> Self {
        Self { writer: None }
    }
}

impl Default for HoundAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for HoundAudioSink {
    fn open(&mut self, path: &Path, format: &AudioFormat) -> Result<(), SinkError> {
        if self.writer.is_some() {
            return Err(SinkError::OpenFailed("writer already open".into()));
        }
        let spec = hound::WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: (SAMPLE_WIDTH_BYTES * 8) as u16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(path, spec)
            .map_err(|e| SinkError::OpenFailed(e.to_string()))?;
        self.writer = Some(writer);
        Ok(())
    }

    fn append(&mut self, chunk: AudioChunk) -> Result<(), SinkError> {
        let writer = self.writer.as_mut().ok_or(SinkError::NotOpen)?;
        for &sample in chunk.samples() {
            writer
                .write_sample(sample)
                .map_err(|e| SinkError::WriteFailed(e.to_string()))?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        let writer = self.writer.take().ok_or(SinkError::NotOpen)?;
        writer
            .finalize()
            .map_err(|e| SinkError::CloseFailed(e.to_string()))
    }
}
