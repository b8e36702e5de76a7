//! ThermaCap - segmented radiometric video and audio recorder
//!
//! This crate records thermal camera footage in fixed-duration segments,
//! normalizes 16-bit radiometric counts into display-ready video, captures
//! a synchronized audio track and combines the two per segment.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects for frames, audio, segments, and configuration
//! - **Application**: The segment scheduler use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, ffmpeg, hound, sysinfo)
//! - **CLI**: Command-line interface, argument parsing, and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
