//! Mux infrastructure module

mod ffmpeg_muxer;

pub use ffmpeg_muxer::FfmpegMuxer;
