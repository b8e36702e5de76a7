//! Main app runner for a recording run

use std::process::ExitCode;
use std::sync::Arc;

use tokio::fs;

use crate::application::ports::ConfigStore;
use crate::application::{ScheduleError, SchedulerCallbacks, SegmentScheduler};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    CpalAudioInput, FfmpegMuxer, FfmpegVideoSink, HoundAudioSink, SyntheticCamera,
    SysinfoMonitor, XdgConfigStore,
};

use super::args::Cli;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run one recording: configure, capture every segment, report the artifacts
pub async fn run_record(cli: &Cli) -> ExitCode {
    let presenter = Arc::new(Presenter::new());

    let merged = load_merged_config(cli_overrides(cli)).await;
    let config = match merged.to_pipeline() {
        Ok(config) => config,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    if let Err(e) = fs::create_dir_all(&config.output_dir).await {
        presenter.error(&format!(
            "Cannot create output directory {}: {}",
            config.output_dir.display(),
            e
        ));
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.info(&format!(
        "Recording {} segment(s) of {}s at {} fps into {}",
        config.segment_count,
        config.segment_duration_secs,
        config.frame_rate,
        config.output_dir.display()
    ));

    // Build adapters
    let camera = SyntheticCamera::new(config.frame_width, config.frame_height);
    let audio = CpalAudioInput::new();
    let video_sink = FfmpegVideoSink::new(config.video_bitrate);
    let audio_sink = HoundAudioSink::new();
    let muxer = FfmpegMuxer::new();
    let memory = SysinfoMonitor::new();

    let mut scheduler =
        SegmentScheduler::new(config, camera, audio, video_sink, audio_sink, muxer, memory);

    // The presenter owns the per-segment progress bar and the mux spinner
    let on_start = Arc::clone(&presenter);
    let on_frame = Arc::clone(&presenter);
    let on_mux = Arc::clone(&presenter);
    let on_end = Arc::clone(&presenter);
    let callbacks = SchedulerCallbacks {
        on_segment_start: Some(Box::new(move |segment| {
            on_start.info(&format!(
                "Segment {}: {}",
                segment.index,
                segment.video_path.display()
            ));
            on_start.start_capture_progress(segment.target_frame_count);
        })),
        on_frame: Some(Box::new(move |iteration, _target| {
            on_frame.update_capture_progress(iteration);
        })),
        on_mux_start: Some(Box::new(move |segment| {
            on_mux.finish_capture_progress();
            on_mux.start_spinner(&format!(
                "Combining audio and video for segment {}",
                segment
            ));
        })),
        on_segment_end: Some(Box::new(move |outcome| {
            on_end.finish_capture_progress();
            if let Some(ref mux_error) = outcome.mux_error {
                on_end.spinner_fail(&format!(
                    "Segment {} mux failed: {}",
                    outcome.index, mux_error
                ));
            } else if outcome.combined_path.is_some() {
                on_end.spinner_success(&format!("Segment {} combined", outcome.index));
            } else {
                on_end.stop_spinner();
            }
            if let Some(ref fault) = outcome.fault {
                on_end.error(&format!("Segment {} failed: {}", outcome.index, fault));
            } else if outcome.memory_aborted {
                on_end.warn(&format!(
                    "Segment {} stopped early under memory pressure ({} frames kept)",
                    outcome.index, outcome.frames_written
                ));
            } else {
                on_end.success(&format!(
                    "Segment {} complete ({} frames, {} skipped)",
                    outcome.index, outcome.frames_written, outcome.frames_skipped
                ));
            }
        })),
    };

    let report = match scheduler.run(&callbacks).await {
        Ok(report) => report,
        Err(ScheduleError::Config(e)) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Some(ref e) = report.camera_release_error {
        presenter.warn(&format!("Camera session did not close cleanly: {}", e));
    }

    // Artifact paths on stdout so they pipe cleanly
    for outcome in &report.segments {
        presenter.output(&outcome.video_path.display().to_string());
        if outcome.audio_chunks > 0 {
            presenter.output(&outcome.audio_path.display().to_string());
        }
        if let Some(ref combined) = outcome.combined_path {
            presenter.output(&combined.display().to_string());
        }
    }

    if report.all_succeeded() {
        presenter.success(&format!(
            "Recorded {} frame(s) across {} segment(s)",
            report.total_frames_written(),
            report.segments.len()
        ));
        ExitCode::from(EXIT_SUCCESS)
    } else {
        presenter.error("One or more segments failed");
        ExitCode::from(EXIT_ERROR)
    }
}

/// Lift command-line flags into a partial config for merging
fn cli_overrides(cli: &Cli) -> AppConfig {
    AppConfig {
        frame_rate: cli.frame_rate,
        segment_duration: cli.duration,
        segment_count: cli.parts,
        scale_lower: cli.scale_lower,
        scale_upper: cli.scale_upper,
        audio: cli.no_audio.then_some(false),
        mux: cli.no_mux.then_some(false),
        memory_threshold_percent: cli.memory_threshold,
        video_bitrate: cli.bitrate,
        output_dir: cli
            .output_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        ..Default::default()
    }
}

/// Load and merge configuration from file and CLI.
/// Environment overrides arrive through clap's env-backed flags, so they
/// land in the CLI tier and still lose to an explicit flag.
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}
