//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;

// Re-export common types
pub use capture::{
    AudioChunk, AudioFormat, NormalizedFrame, RadiometricScale, RawThermalFrame, RecordingSegment,
};
pub use config::{AppConfig, PipelineConfig};
pub use error::{ConfigError, ConfigField};
