//! WAV sink infrastructure module

mod hound_writer;

pub use hound_writer::HoundAudioSink;
