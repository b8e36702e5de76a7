//! Capture value objects and pure pixel math

pub mod audio;
pub mod frame;
pub mod normalizer;
pub mod segment;

pub use audio::{AudioChunk, AudioFormat, SAMPLE_WIDTH_BYTES};
pub use frame::{NormalizedFrame, RawThermalFrame};
pub use normalizer::{RadiometricScale, COUNTS_PER_KELVIN};
pub use segment::RecordingSegment;
