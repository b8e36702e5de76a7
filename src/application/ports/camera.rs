//! Thermal camera port interface

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::RawThermalFrame;

/// Camera errors. `Hardware` is segment-fatal; configuration failures
/// abort the whole run before any capture starts.
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    #[error("Camera rejected configuration: {0}")]
    Configuration(String),

    #[error("No thermal camera available")]
    NoCamera,

    #[error("Acquisition session not started")]
    NotAcquiring,

    #[error("Camera hardware fault: {0}")]
    Hardware(String),
}

/// The sensor settings the pipeline pushes down before acquisition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Lower radiometric scale limit in Kelvin
    pub scale_lower: f64,
    /// Upper radiometric scale limit in Kelvin
    pub scale_upper: f64,
    /// Acquisition frame rate
    pub frame_rate: u32,
    /// On-sensor noise reduction
    pub noise_reduction: bool,
}

/// Result of one frame grab. Partial or late frames are ordinary results,
/// not errors: the caller skips the slot and keeps the loop running.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameGrab {
    /// A complete frame was delivered
    Complete(RawThermalFrame),
    /// The driver reported a partial/corrupt frame with its status code
    Incomplete { status: i32 },
    /// No frame arrived within the grab timeout
    TimedOut,
}

/// Port for the radiometric camera driver.
///
/// `begin`/`end` bracket a scoped acquisition session; the scheduler
/// guarantees `end` runs exactly once on every exit path. `configure`
/// must be called before `begin`.
#[async_trait]
pub trait ThermalCamera: Send {
    /// Apply sensor settings. Must precede [`ThermalCamera::begin`].
    async fn configure(&mut self, settings: &CameraSettings) -> Result<(), CameraError>;

    /// Start continuous acquisition.
    async fn begin(&mut self) -> Result<(), CameraError>;

    /// Block up to `timeout` for the next frame.
    async fn next_frame(&mut self, timeout: Duration) -> Result<FrameGrab, CameraError>;

    /// Stop acquisition and release the session.
    async fn end(&mut self) -> Result<(), CameraError>;
}
