//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, ffmpeg and the OS.

pub mod audio;
pub mod camera;
pub mod config;
pub mod memory;
pub mod mux;
pub mod video;
pub mod wav;

// Re-export adapters
pub use audio::CpalAudioInput;
pub use camera::SyntheticCamera;
pub use config::XdgConfigStore;
pub use memory::SysinfoMonitor;
pub use mux::FfmpegMuxer;
pub use video::FfmpegVideoSink;
pub use wav::HoundAudioSink;
