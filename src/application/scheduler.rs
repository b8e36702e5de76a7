//! Segmented recording use case

use std::path::PathBuf;

use chrono::Local;
use thiserror::Error;

use crate::domain::capture::{AudioFormat, RadiometricScale, RecordingSegment};
use crate::domain::config::PipelineConfig;
use crate::domain::error::ConfigError;

use super::ports::{
    AudioInput, AudioSink, CameraError, CameraSettings, FrameGrab, MemoryMonitor, Muxer,
    ThermalCamera, VideoSink,
};

/// Errors that abort a run before any segment is captured
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid pipeline configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Camera session failed: {0}")]
    Camera(#[from] CameraError),
}

/// Observable scheduler state, mostly for tests and status output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Configuring,
    Capturing { segment: u32 },
    Finalizing { segment: u32 },
    Muxing { segment: u32 },
    Done,
    Failed,
}

/// What one segment produced and how it ended.
///
/// A segment succeeds unless a hardware fault or a mux failure occurred;
/// a memory-pressure abort yields a shorter but still successful segment.
#[derive(Debug, Clone)]
pub struct SegmentOutcome {
    pub index: u32,
    /// Iterations the capture loop consumed (at most the frame budget)
    pub iterations: u32,
    /// Frames normalized and handed to the video sink
    pub frames_written: u32,
    /// Incomplete or timed-out slots skipped without a write
    pub frames_skipped: u32,
    /// Audio chunks appended to the audio sink
    pub audio_chunks: u32,
    /// The memory failsafe stopped the loop early
    pub memory_aborted: bool,
    /// Segment-fatal hardware fault, if one occurred
    pub fault: Option<String>,
    /// Mux failure, if the combine step was attempted and failed
    pub mux_error: Option<String>,
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
    /// Present only when muxing was attempted and succeeded
    pub combined_path: Option<PathBuf>,
}

impl SegmentOutcome {
    fn new(segment: &RecordingSegment) -> Self {
        Self {
            index: segment.index,
            iterations: 0,
            frames_written: 0,
            frames_skipped: 0,
            audio_chunks: 0,
            memory_aborted: false,
            fault: None,
            mux_error: None,
            video_path: segment.video_path.clone(),
            audio_path: segment.audio_path.clone(),
            combined_path: None,
        }
    }

    /// Keep the first fault; later release errors must not mask it
    fn note_fault(&mut self, message: String) {
        if self.fault.is_none() {
            self.fault = Some(message);
        }
    }

    pub fn success(&self) -> bool {
        self.fault.is_none() && self.mux_error.is_none()
    }
}

/// Aggregate result of one multi-segment run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub segments: Vec<SegmentOutcome>,
    /// Error from releasing the camera session, if any
    pub camera_release_error: Option<String>,
}

impl RunReport {
    /// Logical AND across all segment outcomes
    pub fn all_succeeded(&self) -> bool {
        self.segments.iter().all(SegmentOutcome::success)
    }

    pub fn total_frames_written(&self) -> u32 {
        self.segments.iter().map(|s| s.frames_written).sum()
    }
}

/// Progress and lifecycle callbacks for status output
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct SchedulerCallbacks {
    /// Called when a segment's capture loop starts
    pub on_segment_start: Option<Box<dyn Fn(&RecordingSegment) + Send + Sync>>,
    /// Called after each iteration with (iteration, target_frame_count)
    pub on_frame: Option<Box<dyn Fn(u32, u32) + Send + Sync>>,
    /// Called when a segment's mux step starts
    pub on_mux_start: Option<Box<dyn Fn(u32) + Send + Sync>>,
    /// Called when a segment is fully finalized
    pub on_segment_end: Option<Box<dyn Fn(&SegmentOutcome) + Send + Sync>>,
}

/// Drives one recording run: a camera session spanning `segment_count`
/// segments, each with its own audio stream, sinks and mux step.
///
/// Single sequential loop; no parallelism between camera I/O, audio I/O and
/// encoding. Audio chunks are read in fixed ratio to video frames, which
/// keeps the streams loosely aligned without independent clocks (drift under
/// call-latency variance is an accepted trade-off of this design).
pub struct SegmentScheduler<C, A, V, S, X, M>
where
    C: ThermalCamera,
    A: AudioInput,
    V: VideoSink,
    S: AudioSink,
    X: Muxer,
    M: MemoryMonitor,
{
    camera: C,
    audio: A,
    video_sink: V,
    audio_sink: S,
    muxer: X,
    memory: M,
    config: PipelineConfig,
    scale: RadiometricScale,
    state: SchedulerState,
}

impl<C, A, V, S, X, M> SegmentScheduler<C, A, V, S, X, M>
where
    C: ThermalCamera,
    A: AudioInput,
    V: VideoSink,
    S: AudioSink,
    X: Muxer,
    M: MemoryMonitor,
{
    pub fn new(
        config: PipelineConfig,
        camera: C,
        audio: A,
        video_sink: V,
        audio_sink: S,
        muxer: X,
        memory: M,
    ) -> Self {
        let scale = RadiometricScale::new(config.scale_lower, config.scale_upper);
        Self {
            camera,
            audio,
            video_sink,
            audio_sink,
            muxer,
            memory,
            config,
            scale,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Execute the full run. Configuration errors abort before any capture;
    /// per-segment faults are folded into the report instead.
    pub async fn run(
        &mut self,
        callbacks: &SchedulerCallbacks,
    ) -> Result<RunReport, ScheduleError> {
        self.state = SchedulerState::Configuring;

        if let Err(e) = self.config.validate() {
            self.state = SchedulerState::Failed;
            return Err(e.into());
        }

        let settings = CameraSettings {
            scale_lower: self.config.scale_lower,
            scale_upper: self.config.scale_upper,
            frame_rate: self.config.frame_rate,
            noise_reduction: self.config.noise_reduction,
        };
        if let Err(e) = self.camera.configure(&settings).await {
            self.state = SchedulerState::Failed;
            return Err(e.into());
        }
        if let Err(e) = self.camera.begin().await {
            self.state = SchedulerState::Failed;
            return Err(e.into());
        }

        // Each segment is independent: a fault or early abort in one never
        // prevents scheduling of the next.
        let mut segments = Vec::with_capacity(self.config.segment_count as usize);
        for index in 1..=self.config.segment_count {
            let outcome = self.record_segment(index, callbacks).await;
            if let Some(ref cb) = callbacks.on_segment_end {
                cb(&outcome);
            }
            segments.push(outcome);
        }

        // The acquisition session ends exactly once, faults or not
        let camera_release_error = self.camera.end().await.err().map(|e| e.to_string());

        self.state = SchedulerState::Done;
        Ok(RunReport {
            segments,
            camera_release_error,
        })
    }

    async fn record_segment(
        &mut self,
        index: u32,
        callbacks: &SchedulerCallbacks,
    ) -> SegmentOutcome {
        let segment = RecordingSegment::plan(&self.config, index, Local::now());
        let mut outcome = SegmentOutcome::new(&segment);

        if let Some(ref cb) = callbacks.on_segment_start {
            cb(&segment);
        }

        let audio_format = AudioFormat {
            sample_rate: self.config.audio_sample_rate,
            channels: self.config.audio_channels,
            chunk_size: self.config.audio_chunk_size,
        };

        let mut audio_open = false;
        if self.config.audio_enabled {
            match self.audio.open(&audio_format).await {
                Ok(()) => audio_open = true,
                Err(e) => {
                    outcome.note_fault(format!("audio stream: {}", e));
                    return outcome;
                }
            }
        }

        if let Err(e) = self
            .video_sink
            .open(
                &segment.video_path,
                self.config.frame_rate,
                self.config.frame_width,
                self.config.frame_height,
            )
            .await
        {
            outcome.note_fault(format!("video sink: {}", e));
            if audio_open {
                if let Err(e) = self.audio.close().await {
                    outcome.note_fault(format!("audio stream: {}", e));
                }
            }
            return outcome;
        }

        let mut audio_sink_open = false;
        if audio_open {
            match self.audio_sink.open(&segment.audio_path, &audio_format) {
                Ok(()) => audio_sink_open = true,
                Err(e) => outcome.note_fault(format!("audio sink: {}", e)),
            }
        }

        if outcome.fault.is_none() {
            self.capture_loop(&segment, audio_open, audio_sink_open, &mut outcome, callbacks)
                .await;
        }

        // Finalizing: every exit path releases the segment's resources, so a
        // fault mid-loop still yields closed, playable files.
        self.state = SchedulerState::Finalizing { segment: index };
        if let Err(e) = self.video_sink.close().await {
            outcome.note_fault(format!("video sink: {}", e));
        }
        if audio_open {
            if let Err(e) = self.audio.close().await {
                outcome.note_fault(format!("audio stream: {}", e));
            }
        }
        if audio_sink_open {
            if let Err(e) = self.audio_sink.finalize() {
                outcome.note_fault(format!("audio sink: {}", e));
            }
        }

        // Muxing is attempted even for partial or faulted segments; a mux
        // failure never touches the raw artifacts.
        if self.config.mux_enabled && audio_sink_open {
            self.state = SchedulerState::Muxing { segment: index };
            if let Some(ref cb) = callbacks.on_mux_start {
                cb(index);
            }
            match self
                .muxer
                .remux(
                    &segment.video_path,
                    &segment.audio_path,
                    &segment.combined_path,
                )
                .await
            {
                Ok(()) => outcome.combined_path = Some(segment.combined_path.clone()),
                Err(e) => outcome.mux_error = Some(e.to_string()),
            }
        }

        outcome
    }

    async fn capture_loop(
        &mut self,
        segment: &RecordingSegment,
        audio_open: bool,
        audio_sink_open: bool,
        outcome: &mut SegmentOutcome,
        callbacks: &SchedulerCallbacks,
    ) {
        self.state = SchedulerState::Capturing {
            segment: segment.index,
        };
        let chunks_per_frame = self.config.audio_chunks_per_frame();
        let timeout = self.config.frame_timeout();

        for iteration in 1..=segment.target_frame_count {
            outcome.iterations = iteration;

            // 1) acquire one frame (or a skippable non-frame)
            let grab = match self.camera.next_frame(timeout).await {
                Ok(grab) => grab,
                Err(e) => {
                    outcome.note_fault(format!("camera: {}", e));
                    return;
                }
            };

            // 2) drain this slot's share of the audio stream
            let mut slot_chunks = Vec::with_capacity(chunks_per_frame as usize);
            if audio_open {
                for _ in 0..chunks_per_frame {
                    match self.audio.read_chunk().await {
                        Ok(chunk) => slot_chunks.push(chunk),
                        Err(e) => {
                            outcome.note_fault(format!("audio stream: {}", e));
                            return;
                        }
                    }
                }
            }

            // 3) normalize and persist; incomplete/late slots still consume
            //    the iteration so segment duration stays bounded
            match grab {
                FrameGrab::Complete(raw) => {
                    let frame = self.scale.normalize_frame(&raw);
                    if let Err(e) = self.video_sink.write(&frame).await {
                        outcome.note_fault(format!("video sink: {}", e));
                        return;
                    }
                    outcome.frames_written += 1;
                }
                FrameGrab::Incomplete { .. } | FrameGrab::TimedOut => {
                    outcome.frames_skipped += 1;
                }
            }

            // 4) append the slot's audio
            if audio_sink_open {
                for chunk in slot_chunks {
                    if let Err(e) = self.audio_sink.append(chunk) {
                        outcome.note_fault(format!("audio sink: {}", e));
                        return;
                    }
                    outcome.audio_chunks += 1;
                }
            }

            if let Some(ref cb) = callbacks.on_frame {
                cb(iteration, segment.target_frame_count);
            }

            // 5) memory failsafe: soft-abort this segment only
            if self.memory.percent_used() > self.config.memory_threshold_percent {
                outcome.memory_aborted = true;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::application::ports::{AudioError, MuxError, SinkError};
    use crate::domain::capture::{AudioChunk, NormalizedFrame, RawThermalFrame};

    // Shared counters so tests can observe mocks the scheduler owns
    #[derive(Default, Clone)]
    struct Counters {
        configure_calls: Arc<AtomicU32>,
        begin_calls: Arc<AtomicU32>,
        end_calls: Arc<AtomicU32>,
        audio_opens: Arc<AtomicU32>,
        audio_closes: Arc<AtomicU32>,
        audio_reads: Arc<AtomicU32>,
        video_opens: Arc<AtomicU32>,
        video_writes: Arc<AtomicU32>,
        video_closes: Arc<AtomicU32>,
        sink_opens: Arc<AtomicU32>,
        sink_appends: Arc<AtomicU32>,
        sink_finalizes: Arc<AtomicU32>,
        mux_calls: Arc<AtomicU32>,
    }

    struct MockCamera {
        counters: Counters,
        /// Scripted grab results; exhausted script yields complete frames
        script: Mutex<VecDeque<Result<FrameGrab, CameraError>>>,
    }

    impl MockCamera {
        fn new(counters: &Counters) -> Self {
            Self {
                counters: counters.clone(),
                script: Mutex::new(VecDeque::new()),
            }
        }

        fn with_script(
            counters: &Counters,
            script: Vec<Result<FrameGrab, CameraError>>,
        ) -> Self {
            Self {
                counters: counters.clone(),
                script: Mutex::new(script.into()),
            }
        }

        fn complete_frame() -> FrameGrab {
            FrameGrab::Complete(RawThermalFrame::uniform(4, 4, 30_000))
        }
    }

    #[async_trait]
    impl ThermalCamera for MockCamera {
        async fn configure(&mut self, _settings: &CameraSettings) -> Result<(), CameraError> {
            self.counters.configure_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn begin(&mut self) -> Result<(), CameraError> {
            self.counters.begin_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn next_frame(&mut self, _timeout: Duration) -> Result<FrameGrab, CameraError> {
            match self.script.lock().unwrap().pop_front() {
                Some(result) => result,
                None => Ok(Self::complete_frame()),
            }
        }

        async fn end(&mut self) -> Result<(), CameraError> {
            self.counters.end_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MockAudio {
        counters: Counters,
        format: Option<AudioFormat>,
        /// Fail reads once this many have succeeded, if set
        fail_after: Option<u32>,
    }

    impl MockAudio {
        fn new(counters: &Counters) -> Self {
            Self {
                counters: counters.clone(),
                format: None,
                fail_after: None,
            }
        }
    }

    #[async_trait]
    impl AudioInput for MockAudio {
        async fn open(&mut self, format: &AudioFormat) -> Result<(), AudioError> {
            self.counters.audio_opens.fetch_add(1, Ordering::SeqCst);
            self.format = Some(*format);
            Ok(())
        }

        async fn read_chunk(&mut self) -> Result<AudioChunk, AudioError> {
            let reads = self.counters.audio_reads.fetch_add(1, Ordering::SeqCst);
            if let Some(limit) = self.fail_after {
                if reads >= limit {
                    return Err(AudioError::ReadFailed("stream underrun".into()));
                }
            }
            let format = self.format.ok_or(AudioError::NotOpen)?;
            Ok(AudioChunk::silence(&format))
        }

        async fn close(&mut self) -> Result<(), AudioError> {
            self.counters.audio_closes.fetch_add(1, Ordering::SeqCst);
            self.format = None;
            Ok(())
        }
    }

    struct MockVideoSink {
        counters: Counters,
    }

    #[async_trait]
    impl VideoSink for MockVideoSink {
        async fn open(
            &mut self,
            _path: &Path,
            _frame_rate: u32,
            _width: u32,
            _height: u32,
        ) -> Result<(), SinkError> {
            self.counters.video_opens.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn write(&mut self, _frame: &NormalizedFrame) -> Result<(), SinkError> {
            self.counters.video_writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn close(&mut self) -> Result<(), SinkError> {
            self.counters.video_closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MockAudioSink {
        counters: Counters,
    }

    impl AudioSink for MockAudioSink {
        fn open(&mut self, _path: &Path, _format: &AudioFormat) -> Result<(), SinkError> {
            self.counters.sink_opens.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn append(&mut self, _chunk: AudioChunk) -> Result<(), SinkError> {
            self.counters.sink_appends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn finalize(&mut self) -> Result<(), SinkError> {
            self.counters.sink_finalizes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct MockMuxer {
        counters: Counters,
        fail: bool,
    }

    #[async_trait]
    impl Muxer for MockMuxer {
        async fn remux(
            &self,
            _video: &Path,
            _audio: &Path,
            _output: &Path,
        ) -> Result<(), MuxError> {
            self.counters.mux_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(MuxError::MuxFailed("encoder exploded".into()))
            } else {
                Ok(())
            }
        }
    }

    struct MockMemory {
        /// Per-poll readings; exhausted script reads low pressure
        script: Mutex<VecDeque<f32>>,
    }

    impl MockMemory {
        fn calm() -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
            }
        }

        fn with_script(script: Vec<f32>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    impl MemoryMonitor for MockMemory {
        fn percent_used(&mut self) -> f32 {
            self.script.lock().unwrap().pop_front().unwrap_or(10.0)
        }
    }

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            frame_rate: 10,
            segment_duration_secs: 10,
            segment_count: 1,
            audio_sample_rate: 44_100,
            audio_chunk_size: 1024,
            frame_width: 4,
            frame_height: 4,
            output_dir: PathBuf::from("/tmp/thermacap-test"),
            ..Default::default()
        }
    }

    fn scheduler_with(
        config: PipelineConfig,
        counters: &Counters,
        camera: MockCamera,
        memory: MockMemory,
        mux_fails: bool,
    ) -> SegmentScheduler<MockCamera, MockAudio, MockVideoSink, MockAudioSink, MockMuxer, MockMemory>
    {
        SegmentScheduler::new(
            config,
            camera,
            MockAudio::new(counters),
            MockVideoSink {
                counters: counters.clone(),
            },
            MockAudioSink {
                counters: counters.clone(),
            },
            MockMuxer {
                counters: counters.clone(),
                fail: mux_fails,
            },
            memory,
        )
    }

    #[tokio::test]
    async fn full_segment_meets_frame_and_chunk_budgets() {
        let counters = Counters::default();
        let camera = MockCamera::new(&counters);
        let mut scheduler = scheduler_with(
            test_config(),
            &counters,
            camera,
            MockMemory::calm(),
            false,
        );

        let report = scheduler.run(&SchedulerCallbacks::default()).await.unwrap();

        let outcome = &report.segments[0];
        assert_eq!(outcome.iterations, 100);
        assert_eq!(outcome.frames_written, 100);
        assert_eq!(outcome.frames_skipped, 0);
        // 4 chunks per frame over 100 iterations
        assert_eq!(outcome.audio_chunks, 400);
        assert!(outcome.success());
        assert!(report.all_succeeded());
        assert_eq!(counters.video_writes.load(Ordering::SeqCst), 100);
        assert_eq!(counters.sink_appends.load(Ordering::SeqCst), 400);
        assert_eq!(counters.mux_calls.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.state(), SchedulerState::Done);
    }

    #[tokio::test]
    async fn incomplete_frames_consume_iterations_without_writes() {
        let counters = Counters::default();
        let mut script: Vec<Result<FrameGrab, CameraError>> = Vec::new();
        for i in 0..100 {
            if i % 20 == 0 {
                script.push(Ok(FrameGrab::Incomplete { status: -1 }));
            } else {
                script.push(Ok(MockCamera::complete_frame()));
            }
        }
        let camera = MockCamera::with_script(&counters, script);
        let mut scheduler = scheduler_with(
            test_config(),
            &counters,
            camera,
            MockMemory::calm(),
            false,
        );

        let report = scheduler.run(&SchedulerCallbacks::default()).await.unwrap();

        let outcome = &report.segments[0];
        assert_eq!(outcome.iterations, 100);
        assert_eq!(outcome.frames_written, 95);
        assert_eq!(outcome.frames_skipped, 5);
        // Skipped slots still pull their audio share
        assert_eq!(outcome.audio_chunks, 400);
        assert!(outcome.success());
    }

    #[tokio::test]
    async fn timed_out_grabs_are_skipped_not_fatal() {
        let counters = Counters::default();
        let camera = MockCamera::with_script(&counters, vec![Ok(FrameGrab::TimedOut)]);
        let mut scheduler = scheduler_with(
            test_config(),
            &counters,
            camera,
            MockMemory::calm(),
            false,
        );

        let report = scheduler.run(&SchedulerCallbacks::default()).await.unwrap();
        let outcome = &report.segments[0];
        assert_eq!(outcome.iterations, 100);
        assert_eq!(outcome.frames_written, 99);
        assert_eq!(outcome.frames_skipped, 1);
        assert!(outcome.success());
    }

    #[tokio::test]
    async fn hardware_fault_releases_everything_and_later_segments_run() {
        let counters = Counters::default();
        // 49 good frames, then a driver fault on iteration 50 (segment 1);
        // segment 2's grabs come from the exhausted-script default.
        let mut script: Vec<Result<FrameGrab, CameraError>> =
            (0..49).map(|_| Ok(MockCamera::complete_frame())).collect();
        script.push(Err(CameraError::Hardware("transport error".into())));
        let camera = MockCamera::with_script(&counters, script);

        let config = PipelineConfig {
            segment_count: 2,
            ..test_config()
        };
        let mut scheduler =
            scheduler_with(config, &counters, camera, MockMemory::calm(), false);

        let report = scheduler.run(&SchedulerCallbacks::default()).await.unwrap();

        assert_eq!(report.segments.len(), 2);
        let faulted = &report.segments[0];
        assert!(!faulted.success());
        assert!(faulted.fault.as_deref().unwrap().contains("transport error"));
        assert_eq!(faulted.iterations, 50);
        assert_eq!(faulted.frames_written, 49);

        let second = &report.segments[1];
        assert!(second.success());
        assert_eq!(second.frames_written, 100);

        // Session bracketed exactly once; per-segment resources released
        // once per segment even on the fault path.
        assert_eq!(counters.begin_calls.load(Ordering::SeqCst), 1);
        assert_eq!(counters.end_calls.load(Ordering::SeqCst), 1);
        assert_eq!(counters.audio_opens.load(Ordering::SeqCst), 2);
        assert_eq!(counters.audio_closes.load(Ordering::SeqCst), 2);
        assert_eq!(counters.video_closes.load(Ordering::SeqCst), 2);
        assert_eq!(counters.sink_finalizes.load(Ordering::SeqCst), 2);
        // The faulted segment's partial files are still muxed
        assert_eq!(counters.mux_calls.load(Ordering::SeqCst), 2);
        assert!(!report.all_succeeded());
    }

    #[tokio::test]
    async fn audio_fault_is_segment_fatal() {
        let counters = Counters::default();
        let camera = MockCamera::new(&counters);
        let config = test_config();
        let mut scheduler = SegmentScheduler::new(
            config,
            camera,
            MockAudio {
                counters: counters.clone(),
                format: None,
                // 10 iterations' worth of chunks, then a read failure
                fail_after: Some(40),
            },
            MockVideoSink {
                counters: counters.clone(),
            },
            MockAudioSink {
                counters: counters.clone(),
            },
            MockMuxer {
                counters: counters.clone(),
                fail: false,
            },
            MockMemory::calm(),
        );

        let report = scheduler.run(&SchedulerCallbacks::default()).await.unwrap();
        let outcome = &report.segments[0];
        assert!(!outcome.success());
        assert!(outcome.fault.as_deref().unwrap().contains("underrun"));
        assert_eq!(outcome.iterations, 11);
        // Everything still released and finalized
        assert_eq!(counters.audio_closes.load(Ordering::SeqCst), 1);
        assert_eq!(counters.video_closes.load(Ordering::SeqCst), 1);
        assert_eq!(counters.sink_finalizes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn memory_pressure_aborts_current_segment_only() {
        let counters = Counters::default();
        let camera = MockCamera::new(&counters);
        // Threshold is 95; poll 40 of segment 1 reads 96, everything else calm
        let mut readings = vec![10.0_f32; 39];
        readings.push(96.0);
        let config = PipelineConfig {
            segment_count: 2,
            ..test_config()
        };
        let mut scheduler = scheduler_with(
            config,
            &counters,
            camera,
            MockMemory::with_script(readings),
            false,
        );

        let report = scheduler.run(&SchedulerCallbacks::default()).await.unwrap();

        let aborted = &report.segments[0];
        assert!(aborted.memory_aborted);
        assert_eq!(aborted.iterations, 40);
        assert_eq!(aborted.frames_written, 40);
        // A graceful abort is not a failure, and the partial files are muxed
        assert!(aborted.success());

        let second = &report.segments[1];
        assert!(!second.memory_aborted);
        assert_eq!(second.frames_written, 100);

        assert_eq!(counters.mux_calls.load(Ordering::SeqCst), 2);
        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn audio_disabled_touches_no_audio_resources() {
        let counters = Counters::default();
        let camera = MockCamera::new(&counters);
        let config = PipelineConfig {
            audio_enabled: false,
            mux_enabled: false,
            ..test_config()
        };
        let mut scheduler =
            scheduler_with(config, &counters, camera, MockMemory::calm(), false);

        let report = scheduler.run(&SchedulerCallbacks::default()).await.unwrap();

        let outcome = &report.segments[0];
        assert_eq!(outcome.frames_written, 100);
        assert_eq!(outcome.audio_chunks, 0);
        assert!(outcome.combined_path.is_none());
        assert_eq!(counters.audio_opens.load(Ordering::SeqCst), 0);
        assert_eq!(counters.audio_reads.load(Ordering::SeqCst), 0);
        assert_eq!(counters.sink_opens.load(Ordering::SeqCst), 0);
        assert_eq!(counters.mux_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mux_failure_is_reported_but_does_not_block_later_segments() {
        let counters = Counters::default();
        let camera = MockCamera::new(&counters);
        let config = PipelineConfig {
            segment_count: 2,
            ..test_config()
        };
        let mut scheduler =
            scheduler_with(config, &counters, camera, MockMemory::calm(), true);

        let report = scheduler.run(&SchedulerCallbacks::default()).await.unwrap();

        assert_eq!(counters.mux_calls.load(Ordering::SeqCst), 2);
        for outcome in &report.segments {
            assert!(outcome.mux_error.is_some());
            assert!(outcome.combined_path.is_none());
            assert!(!outcome.success());
            // Raw artifacts completed normally
            assert_eq!(outcome.frames_written, 100);
            assert!(outcome.fault.is_none());
        }
        assert!(!report.all_succeeded());
    }

    #[tokio::test]
    async fn invalid_config_fails_before_touching_hardware() {
        let counters = Counters::default();
        let camera = MockCamera::new(&counters);
        let config = PipelineConfig {
            frame_rate: 0,
            ..test_config()
        };
        let mut scheduler =
            scheduler_with(config, &counters, camera, MockMemory::calm(), false);

        let result = scheduler.run(&SchedulerCallbacks::default()).await;
        assert!(matches!(result, Err(ScheduleError::Config(_))));
        assert_eq!(scheduler.state(), SchedulerState::Failed);
        assert_eq!(counters.configure_calls.load(Ordering::SeqCst), 0);
        assert_eq!(counters.begin_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn callbacks_report_per_iteration_progress() {
        let counters = Counters::default();
        let camera = MockCamera::new(&counters);
        let mut scheduler = scheduler_with(
            test_config(),
            &counters,
            camera,
            MockMemory::calm(),
            false,
        );

        let frames_seen = Arc::new(AtomicU32::new(0));
        let ends_seen = Arc::new(AtomicU32::new(0));
        let frames = Arc::clone(&frames_seen);
        let ends = Arc::clone(&ends_seen);
        let callbacks = SchedulerCallbacks {
            on_frame: Some(Box::new(move |iteration, target| {
                assert!(iteration <= target);
                frames.fetch_add(1, Ordering::SeqCst);
            })),
            on_segment_end: Some(Box::new(move |outcome| {
                assert_eq!(outcome.index, 1);
                ends.fetch_add(1, Ordering::SeqCst);
            })),
            ..Default::default()
        };

        scheduler.run(&callbacks).await.unwrap();
        assert_eq!(frames_seen.load(Ordering::SeqCst), 100);
        assert_eq!(ends_seen.load(Ordering::SeqCst), 1);
    }
}
