//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::config::pipeline::PipelineConfig;
use crate::domain::error::ConfigError;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub frame_rate: Option<u32>,
    pub segment_duration: Option<u32>,
    pub segment_count: Option<u32>,
    pub scale_lower: Option<f64>,
    pub scale_upper: Option<f64>,
    pub audio: Option<bool>,
    pub mux: Option<bool>,
    pub audio_sample_rate: Option<u32>,
    pub audio_chunk_size: Option<u32>,
    pub audio_channels: Option<u16>,
    pub memory_threshold_percent: Option<f32>,
    pub video_bitrate: Option<u32>,
    pub noise_reduction: Option<bool>,
    pub output_dir: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        let base = PipelineConfig::default();
        Self {
            frame_rate: Some(base.frame_rate),
            segment_duration: Some(base.segment_duration_secs),
            segment_count: Some(base.segment_count),
            scale_lower: Some(base.scale_lower),
            scale_upper: Some(base.scale_upper),
            audio: Some(base.audio_enabled),
            mux: Some(base.mux_enabled),
            audio_sample_rate: Some(base.audio_sample_rate),
            audio_chunk_size: Some(base.audio_chunk_size),
            audio_channels: Some(base.audio_channels),
            memory_threshold_percent: Some(base.memory_threshold_percent),
            video_bitrate: Some(base.video_bitrate),
            noise_reduction: Some(base.noise_reduction),
            output_dir: Some(".".to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            frame_rate: other.frame_rate.or(self.frame_rate),
            segment_duration: other.segment_duration.or(self.segment_duration),
            segment_count: other.segment_count.or(self.segment_count),
            scale_lower: other.scale_lower.or(self.scale_lower),
            scale_upper: other.scale_upper.or(self.scale_upper),
            audio: other.audio.or(self.audio),
            mux: other.mux.or(self.mux),
            audio_sample_rate: other.audio_sample_rate.or(self.audio_sample_rate),
            audio_chunk_size: other.audio_chunk_size.or(self.audio_chunk_size),
            audio_channels: other.audio_channels.or(self.audio_channels),
            memory_threshold_percent: other
                .memory_threshold_percent
                .or(self.memory_threshold_percent),
            video_bitrate: other.video_bitrate.or(self.video_bitrate),
            noise_reduction: other.noise_reduction.or(self.noise_reduction),
            output_dir: other.output_dir.or(self.output_dir),
        }
    }

    /// Resolve into the immutable pipeline configuration, filling unset
    /// fields with defaults and validating the result once.
    pub fn to_pipeline(&self) -> Result<PipelineConfig, ConfigError> {
        let base = PipelineConfig::default();
        let audio_enabled = self.audio.unwrap_or(base.audio_enabled);
        let config = PipelineConfig {
            frame_rate: self.frame_rate.unwrap_or(base.frame_rate),
            segment_duration_secs: self.segment_duration.unwrap_or(base.segment_duration_secs),
            segment_count: self.segment_count.unwrap_or(base.segment_count),
            scale_lower: self.scale_lower.unwrap_or(base.scale_lower),
            scale_upper: self.scale_upper.unwrap_or(base.scale_upper),
            frame_width: base.frame_width,
            frame_height: base.frame_height,
            audio_enabled,
            audio_sample_rate: self.audio_sample_rate.unwrap_or(base.audio_sample_rate),
            audio_chunk_size: self.audio_chunk_size.unwrap_or(base.audio_chunk_size),
            audio_channels: self.audio_channels.unwrap_or(base.audio_channels),
            memory_threshold_percent: self
                .memory_threshold_percent
                .unwrap_or(base.memory_threshold_percent),
            video_bitrate: self.video_bitrate.unwrap_or(base.video_bitrate),
            noise_reduction: self.noise_reduction.unwrap_or(base.noise_reduction),
            frame_timeout_ms: base.frame_timeout_ms,
            // Muxing is meaningless without an audio track
            mux_enabled: audio_enabled && self.mux.unwrap_or(base.mux_enabled),
            output_dir: self
                .output_dir
                .as_deref()
                .map(PathBuf::from)
                .unwrap_or(base.output_dir),
        };
        config.validate()?;
        Ok(config)
    }
}
