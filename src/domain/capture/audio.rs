//! Audio value objects

/// Bytes per PCM sample (signed 16-bit)
pub const SAMPLE_WIDTH_BYTES: u32 = 2;

/// The stream format one capture session records at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Samples per second, per channel
    pub sample_rate: u32,
    /// Interleaved channel count
    pub channels: u16,
    /// Samples (per channel) delivered in one chunk
    pub chunk_size: u32,
}

impl AudioFormat {
    /// Interleaved i16 samples one chunk carries
    pub fn samples_per_chunk(&self) -> usize {
        (self.chunk_size as usize) * (self.channels as usize)
    }

    /// Fixed byte length of one chunk
    pub fn bytes_per_chunk(&self) -> usize {
        self.samples_per_chunk() * SAMPLE_WIDTH_BYTES as usize
    }

    /// Wall-clock time one chunk spans
    pub fn chunk_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(f64::from(self.chunk_size) / f64::from(self.sample_rate))
    }
}

/// One fixed-size buffer of interleaved PCM samples captured in lockstep
/// with video frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    samples: Vec<i16>,
}

impl AudioChunk {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// Silent chunk matching a format, for tests and padding
    pub fn silence(format: &AudioFormat) -> Self {
        Self {
            samples: vec![0; format.samples_per_chunk()],
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_format() -> AudioFormat {
        AudioFormat {
            sample_rate: 44_100,
            channels: 2,
            chunk_size: 1024,
        }
    }

    #[test]
    fn chunk_length_is_chunk_size_times_channels() {
        let format = stereo_format();
        assert_eq!(format.samples_per_chunk(), 2048);
        assert_eq!(format.bytes_per_chunk(), 4096);
    }

    #[test]
    fn silence_matches_format_length() {
        let format = stereo_format();
        let chunk = AudioChunk::silence(&format);
        assert_eq!(chunk.len(), format.samples_per_chunk());
        assert!(chunk.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn chunk_duration_matches_rate() {
        let format = stereo_format();
        let ms = format.chunk_duration().as_secs_f64() * 1000.0;
        // 1024 / 44100 s ~ 23.2 ms
        assert!((23.0..24.0).contains(&ms));
    }
}
