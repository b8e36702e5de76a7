//! Video sink infrastructure module

mod ffmpeg_writer;

pub use ffmpeg_writer::FfmpegVideoSink;
