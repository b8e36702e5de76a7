//! Audio input infrastructure module
//!
//! Microphone capture through cpal, the same cross-platform audio layer
//! used for every supported OS.

mod cpal_input;

pub use cpal_input::CpalAudioInput;
