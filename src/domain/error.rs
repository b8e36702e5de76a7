//! Domain error types

use std::fmt;

use thiserror::Error;

/// The configuration fields that pipeline validation can reject.
///
/// Enumerated so an invalid setting fails fast with a typed field name
/// instead of a runtime string lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    FrameRate,
    SegmentDuration,
    SegmentCount,
    ScaleLimits,
    FrameSize,
    AudioSampleRate,
    AudioChunkSize,
    AudioChannels,
    MemoryThreshold,
    VideoBitrate,
    FrameTimeout,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigField::FrameRate => "frame_rate",
            ConfigField::SegmentDuration => "segment_duration",
            ConfigField::SegmentCount => "segment_count",
            ConfigField::ScaleLimits => "scale_limits",
            ConfigField::FrameSize => "frame_size",
            ConfigField::AudioSampleRate => "audio_sample_rate",
            ConfigField::AudioChunkSize => "audio_chunk_size",
            ConfigField::AudioChannels => "audio_channels",
            ConfigField::MemoryThreshold => "memory_threshold_percent",
            ConfigField::VideoBitrate => "video_bitrate",
            ConfigField::FrameTimeout => "frame_timeout_ms",
        };
        f.write_str(name)
    }
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: ConfigField, reason: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

impl ConfigError {
    /// Shorthand for a pipeline validation failure on a known field.
    pub fn invalid(field: ConfigField, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
