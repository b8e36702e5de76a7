//! Immutable, validated pipeline configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::error::{ConfigError, ConfigField};

/// Default acquisition frame rate (frames per second)
pub const DEFAULT_FRAME_RATE: u32 = 20;

/// The sensor driver rejects rates above this
pub const MAX_FRAME_RATE: u32 = 30;

/// Default length of one recording segment in seconds
pub const DEFAULT_SEGMENT_DURATION_SECS: u32 = 20;

/// Default radiometric scale limits in Kelvin
pub const DEFAULT_SCALE_LOWER: f64 = 290.0;
pub const DEFAULT_SCALE_UPPER: f64 = 310.0;

/// Sensor resolution
pub const DEFAULT_FRAME_WIDTH: u32 = 640;
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

/// Default audio capture settings (44.1 kHz stereo, 1024-sample chunks)
pub const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_AUDIO_CHUNK_SIZE: u32 = 1024;
pub const DEFAULT_AUDIO_CHANNELS: u16 = 2;

/// Default memory-pressure abort threshold (percent of RAM in use)
pub const DEFAULT_MEMORY_THRESHOLD_PERCENT: f32 = 95.0;

/// Default H.264 target bitrate (1 Mbit/s)
pub const DEFAULT_VIDEO_BITRATE: u32 = 1_000_000;

/// Default per-frame grab timeout in milliseconds
pub const DEFAULT_FRAME_TIMEOUT_MS: u64 = 1000;

/// Every tunable the recording pipeline needs, validated once at startup
/// and then shared read-only by all components.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Camera acquisition and video file frame rate
    pub frame_rate: u32,
    /// Wall-clock length of each recording segment
    pub segment_duration_secs: u32,
    /// How many segments to record in one run
    pub segment_count: u32,
    /// Lower radiometric scale limit in Kelvin
    pub scale_lower: f64,
    /// Upper radiometric scale limit in Kelvin
    pub scale_upper: f64,
    /// Frame width in pixels
    pub frame_width: u32,
    /// Frame height in pixels
    pub frame_height: u32,
    /// Whether to capture microphone audio alongside video
    pub audio_enabled: bool,
    /// Audio sample rate in Hz
    pub audio_sample_rate: u32,
    /// Samples per audio chunk (per channel)
    pub audio_chunk_size: u32,
    /// Number of interleaved audio channels
    pub audio_channels: u16,
    /// Abort the current segment when RAM usage exceeds this percentage
    pub memory_threshold_percent: f32,
    /// Target video bitrate in bits per second
    pub video_bitrate: u32,
    /// Whether the camera applies on-sensor noise reduction
    pub noise_reduction: bool,
    /// How long one frame grab may block before the slot is skipped
    pub frame_timeout_ms: u64,
    /// Whether to remux video and audio into a combined file per segment
    pub mux_enabled: bool,
    /// Directory that receives all output artifacts
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            segment_duration_secs: DEFAULT_SEGMENT_DURATION_SECS,
            segment_count: 1,
            scale_lower: DEFAULT_SCALE_LOWER,
            scale_upper: DEFAULT_SCALE_UPPER,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            audio_enabled: true,
            audio_sample_rate: DEFAULT_AUDIO_SAMPLE_RATE,
            audio_chunk_size: DEFAULT_AUDIO_CHUNK_SIZE,
            audio_channels: DEFAULT_AUDIO_CHANNELS,
            memory_threshold_percent: DEFAULT_MEMORY_THRESHOLD_PERCENT,
            video_bitrate: DEFAULT_VIDEO_BITRATE,
            noise_reduction: true,
            frame_timeout_ms: DEFAULT_FRAME_TIMEOUT_MS,
            mux_enabled: true,
            output_dir: PathBuf::from("."),
        }
    }
}

impl PipelineConfig {
    /// Check every field once, before any hardware is touched.
    /// Returns the first violation as an enumerated invalid-field error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 || self.frame_rate > MAX_FRAME_RATE {
            return Err(ConfigError::invalid(
                ConfigField::FrameRate,
                format!("must be between 1 and {}", MAX_FRAME_RATE),
            ));
        }
        if self.segment_duration_secs == 0 {
            return Err(ConfigError::invalid(
                ConfigField::SegmentDuration,
                "must be at least 1 second",
            ));
        }
        if self.segment_count == 0 {
            return Err(ConfigError::invalid(
                ConfigField::SegmentCount,
                "must record at least 1 segment",
            ));
        }
        if !(self.scale_lower.is_finite() && self.scale_upper.is_finite())
            || self.scale_lower >= self.scale_upper
        {
            return Err(ConfigError::invalid(
                ConfigField::ScaleLimits,
                format!(
                    "lower limit {} must be below upper limit {}",
                    self.scale_lower, self.scale_upper
                ),
            ));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::invalid(
                ConfigField::FrameSize,
                "width and height must be non-zero",
            ));
        }
        if self.audio_sample_rate == 0 {
            return Err(ConfigError::invalid(
                ConfigField::AudioSampleRate,
                "must be non-zero",
            ));
        }
        if self.audio_chunk_size == 0 {
            return Err(ConfigError::invalid(
                ConfigField::AudioChunkSize,
                "must be non-zero",
            ));
        }
        if self.audio_channels == 0 || self.audio_channels > 2 {
            return Err(ConfigError::invalid(
                ConfigField::AudioChannels,
                "must be 1 (mono) or 2 (stereo)",
            ));
        }
        if self.audio_enabled && self.audio_chunks_per_frame() == 0 {
            return Err(ConfigError::invalid(
                ConfigField::AudioChunkSize,
                format!(
                    "{} samples per chunk yields no whole chunk per frame at {} Hz / {} fps",
                    self.audio_chunk_size, self.audio_sample_rate, self.frame_rate
                ),
            ));
        }
        if !(self.memory_threshold_percent > 0.0 && self.memory_threshold_percent <= 100.0) {
            return Err(ConfigError::invalid(
                ConfigField::MemoryThreshold,
                "must be within (0, 100]",
            ));
        }
        if self.video_bitrate == 0 {
            return Err(ConfigError::invalid(
                ConfigField::VideoBitrate,
                "must be non-zero",
            ));
        }
        if self.frame_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                ConfigField::FrameTimeout,
                "must be non-zero",
            ));
        }
        Ok(())
    }

    /// Frames each segment's capture loop budgets for
    pub fn target_frame_count(&self) -> u32 {
        self.segment_duration_secs * self.frame_rate
    }

    /// Whole audio chunks read per captured video frame.
    /// Floor division keeps audio consumption at or below real time.
    pub fn audio_chunks_per_frame(&self) -> u32 {
        self.audio_sample_rate / (self.audio_chunk_size * self.frame_rate)
    }

    /// Audio chunks one full-length segment should accumulate
    pub fn target_audio_chunk_count(&self) -> u32 {
        self.target_frame_count() * self.audio_chunks_per_frame()
    }

    /// Nominal wall-clock spacing between frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate))
    }

    /// Grab timeout as a [`Duration`]
    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }
}
