//! Microphone capture using cpal
//!
//! cpal::Stream is not Send, so the stream lives on a dedicated thread for
//! the life of one segment and hands interleaved samples back through a
//! shared buffer. `read_chunk` drains that buffer in fixed-size chunks.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex as StdMutex};
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tokio::time::sleep;

use crate::application::ports::{AudioError, AudioInput};
use crate::domain::capture::{AudioChunk, AudioFormat};

/// Polls of the shared buffer before a read is declared stalled
const READ_POLL_LIMIT: u32 = 400;

/// State shared between the capture thread's stream callback and the reader
struct SharedCapture {
    samples: StdMutex<VecDeque<i16>>,
    running: AtomicBool,
    failed: AtomicBool,
}

/// Microphone input backed by the default cpal host device
pub struct CpalAudioInput {
    format: Option<AudioFormat>,
    shared: Option<Arc<SharedCapture>>,
    worker: Option<JoinHandle<()>>,
}

impl CpalAudioInput {
    pub fn new() -> Self {
        Self {
            format: None,
            shared: None,
            worker: None,
        }
    }

    fn input_device() -> Result<cpal::Device, AudioError> {
        let host = cpal::default_host();
        host.default_input_device().ok_or(AudioError::NoDevice)
    }

    /// Find a supported device config matching the requested format exactly.
    /// No resampling or channel remixing happens downstream, so a mismatch
    /// is an open failure rather than a silent format change.
    fn matching_config(
        device: &cpal::Device,
        format: &AudioFormat,
    ) -> Result<(StreamConfig, SampleFormat), AudioError> {
        let supported = device
            .supported_input_configs()
            .map_err(|e| AudioError::OpenFailed(format!("failed to query configs: {}", e)))?;

        for range in supported {
            let sample_format = range.sample_format();
            if sample_format != SampleFormat::I16 && sample_format != SampleFormat::F32 {
                continue;
            }
            if range.channels() != format.channels {
                continue;
            }
            if range.min_sample_rate().0 <= format.sample_rate
                && range.max_sample_rate().0 >= format.sample_rate
            {
                let config = StreamConfig {
                    channels: format.channels,
                    sample_rate: SampleRate(format.sample_rate),
                    buffer_size: cpal::BufferSize::Default,
                };
                return Ok((config, sample_format));
            }
        }

        Err(AudioError::OpenFailed(format!(
            "no input config for {} Hz / {} channel(s)",
            format.sample_rate, format.channels
        )))
    }

    /// Runs on the capture thread: build the stream, report the outcome
    /// through `ready`, then hold the stream open until `running` clears.
    fn capture_thread(
        shared: Arc<SharedCapture>,
        format: AudioFormat,
        ready: mpsc::Sender<Result<(), AudioError>>,
    ) {
        let device = match Self::input_device() {
            Ok(d) => d,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };
        let (config, sample_format) = match Self::matching_config(&device, &format) {
            Ok(c) => c,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        let buffer = Arc::clone(&shared);
        let error_flag = Arc::clone(&shared);
        let stream_result = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut samples) = buffer.samples.lock() {
                        samples.extend(data.iter().copied());
                    }
                },
                move |err| {
                    eprintln!("Audio stream error: {}", err);
                    error_flag.failed.store(true, Ordering::SeqCst);
                },
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut samples) = buffer.samples.lock() {
                        samples.extend(data.iter().map(|&s| (s * 32767.0) as i16));
                    }
                },
                move |err| {
                    eprintln!("Audio stream error: {}", err);
                    error_flag.failed.store(true, Ordering::SeqCst);
                },
                None,
            ),
            _ => {
                let _ = ready.send(Err(AudioError::OpenFailed(
                    "unsupported sample format".into(),
                )));
                return;
            }
        };

        let stream = match stream_result {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(AudioError::OpenFailed(e.to_string())));
                return;
            }
        };
        if let Err(e) = stream.play() {
            let _ = ready.send(Err(AudioError::OpenFailed(e.to_string())));
            return;
        }
        let _ = ready.send(Ok(()));

        while shared.running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(20));
        }
        drop(stream);
    }
}

impl Default for CpalAudioInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioInput for CpalAudioInput {
    async fn open(&mut self, format: &AudioFormat) -> Result<(), AudioError> {
        if self.shared.is_some() {
            return Err(AudioError::OpenFailed("stream already open".into()));
        }

        let shared = Arc::new(SharedCapture {
            samples: StdMutex::new(VecDeque::new()),
            running: AtomicBool::new(true),
            failed: AtomicBool::new(false),
        });
        let (ready_tx, ready_rx) = mpsc::channel();
        let thread_shared = Arc::clone(&shared);
        let thread_format = *format;
        let worker =
            std::thread::spawn(move || Self::capture_thread(thread_shared, thread_format, ready_tx));

        // Startup handshake runs off the async runtime
        let startup = tokio::task::spawn_blocking(move || {
            ready_rx
                .recv_timeout(Duration::from_secs(5))
                .unwrap_or_else(|_| {
                    Err(AudioError::OpenFailed("stream startup timed out".into()))
                })
        })
        .await
        .map_err(|e| AudioError::OpenFailed(format!("startup task failed: {}", e)))?;

        match startup {
            Ok(()) => {
                self.format = Some(*format);
                self.shared = Some(shared);
                self.worker = Some(worker);
                Ok(())
            }
            Err(e) => {
                shared.running.store(false, Ordering::SeqCst);
                let _ = worker.join();
                Err(e)
            }
        }
    }

    async fn read_chunk(&mut self) -> Result<AudioChunk, AudioError> {
        let format = self.format.ok_or(AudioError::NotOpen)?;
        let shared = self.shared.as_ref().ok_or(AudioError::NotOpen)?;
        let needed = format.samples_per_chunk();
        // Poll a quarter chunk at a time so one call blocks for roughly
        // one chunk duration when the device keeps up
        let poll = format.chunk_duration() / 4;

        for _ in 0..READ_POLL_LIMIT {
            if shared.failed.load(Ordering::SeqCst) {
                return Err(AudioError::ReadFailed("device stream error".into()));
            }
            {
                let mut samples = shared.samples.lock().map_err(|_| {
                    AudioError::ReadFailed("capture buffer poisoned".into())
                })?;
                if samples.len() >= needed {
                    let chunk: Vec<i16> = samples.drain(..needed).collect();
                    return Ok(AudioChunk::new(chunk));
                }
            }
            sleep(poll).await;
        }

        Err(AudioError::ReadFailed("audio stream stalled".into()))
    }

    async fn close(&mut self) -> Result<(), AudioError> {
        if let Some(shared) = self.shared.take() {
            shared.running.store(false, Ordering::SeqCst);
        }
        if let Some(worker) = self.worker.take() {
            let _ = tokio::task::spawn_blocking(move || worker.join()).await;
        }
        self.format = None;
        Ok(())
    }
}
