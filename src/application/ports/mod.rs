//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio_input;
pub mod audio_sink;
pub mod camera;
pub mod config;
pub mod frame_sink;
pub mod memory;
pub mod muxer;

// Re-export common types
pub use audio_input::{AudioError, AudioInput};
pub use audio_sink::AudioSink;
pub use camera::{CameraError, CameraSettings, FrameGrab, ThermalCamera};
pub use config::ConfigStore;
pub use frame_sink::{SinkError, VideoSink};
pub use memory::MemoryMonitor;
pub use muxer::{MuxError, Muxer};
