//! Recording segment planning

use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::domain::config::PipelineConfig;

/// Timestamp layout used in artifact names; hyphenated so the names are
/// valid on filesystems that reject colons.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// One bounded-duration capture-and-encode unit. Created at the start of a
/// scheduler iteration, finalized at its end; a run consists of
/// `segment_count` of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSegment {
    /// 1-based part number within the run
    pub index: u32,
    /// Frame-loop iteration budget for this segment
    pub target_frame_count: u32,
    /// Audio chunks a full-length segment accumulates
    pub target_audio_chunk_count: u32,
    /// Raw H.264 video artifact
    pub video_path: PathBuf,
    /// PCM WAV artifact
    pub audio_path: PathBuf,
    /// Remuxed video+audio artifact
    pub combined_path: PathBuf,
}

impl RecordingSegment {
    /// Plan a segment's budgets and artifact paths. The timestamp is taken
    /// once, at segment start, and shared by all three names.
    pub fn plan(config: &PipelineConfig, index: u32, started_at: DateTime<Local>) -> Self {
        let stamp = started_at.format(TIMESTAMP_FORMAT);
        Self {
            index,
            target_frame_count: config.target_frame_count(),
            target_audio_chunk_count: config.target_audio_chunk_count(),
            video_path: config
                .output_dir
                .join(format!("Video_part{}_{}.mp4", index, stamp)),
            audio_path: config
                .output_dir
                .join(format!("Audio_part{}_{}.wav", index, stamp)),
            combined_path: config
                .output_dir
                .join(format!("VideoWithAudio_part{}_{}.mp4", index, stamp)),
        }
    }
}
