//! Synthetic radiometric frame source
//!
//! Stands in for a real camera driver: no vendor SDK is linked, so frames
//! are generated in software at the configured rate. The grabs are paced
//! against a monotonic deadline, which keeps recorded segments close to
//! their nominal wall-clock duration.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, sleep_until, Instant};

use crate::application::ports::{CameraError, CameraSettings, FrameGrab, ThermalCamera};
use crate::domain::capture::{RawThermalFrame, COUNTS_PER_KELVIN};

pub struct SyntheticCamera {
    width: u32,
    height: u32,
    settings: Option<CameraSettings>,
    acquiring: bool,
    frame_index: u64,
    next_due: Option<Instant>,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            settings: None,
            acquiring: false,
            frame_index: 0,
            next_due: None,
        }
    }

    /// Horizontal temperature gradient across the scale range, with a hot
    /// column sweeping left to right so consecutive frames differ.
    fn synthesize(&self, settings: &CameraSettings) -> RawThermalFrame {
        let lower = (settings.scale_lower * COUNTS_PER_KELVIN) as u32;
        let upper = (settings.scale_upper * COUNTS_PER_KELVIN) as u32;
        let span = upper.saturating_sub(lower);
        let hot_column = (self.frame_index % u64::from(self.width)) as u32;

        let mut counts = Vec::with_capacity((self.width as usize) * (self.height as usize));
        for _y in 0..self.height {
            for x in 0..self.width {
                let count = if x == hot_column {
                    upper
                } else if self.width > 1 {
                    lower + span * x / (self.width - 1)
                } else {
                    lower
                };
                counts.push(count.min(u32::from(u16::MAX)) as u16);
            }
        }

        // Length matches width * height by construction
        RawThermalFrame::new(self.width, self.height, counts, chrono::Utc::now())
            .unwrap_or_else(|| RawThermalFrame::uniform(self.width, self.height, lower as u16))
    }
}

#[async_trait]
impl ThermalCamera for SyntheticCamera {
    async fn configure(&mut self, settings: &CameraSettings) -> Result<(), CameraError> {
        if settings.frame_rate == 0 {
            return Err(CameraError::Configuration("frame rate must be nonzero".into()));
        }
        if settings.scale_upper <= settings.scale_lower {
            return Err(CameraError::Configuration(
                "scale upper limit must exceed the lower limit".into(),
            ));
        }
        self.settings = Some(*settings);
        Ok(())
    }

    async fn begin(&mut self) -> Result<(), CameraError> {
        if self.settings.is_none() {
            return Err(CameraError::Configuration(
                "configure must precede begin".into(),
            ));
        }
        self.acquiring = true;
        self.frame_index = 0;
        self.next_due = Some(Instant::now());
        Ok(())
    }

    async fn next_frame(&mut self, timeout: Duration) -> Result<FrameGrab, CameraError> {
        if !self.acquiring {
            return Err(CameraError::NotAcquiring);
        }
        let settings = self.settings.ok_or(CameraError::NotAcquiring)?;
        let interval = Duration::from_secs(1) / settings.frame_rate;
        let due = self.next_due.unwrap_or_else(Instant::now);

        // Honor the grab timeout the way a driver would: if the next frame
        // is not due within it, the slot is lost.
        let now = Instant::now();
        if due > now + timeout {
            sleep(timeout).await;
            return Ok(FrameGrab::TimedOut);
        }
        sleep_until(due).await;
        self.next_due = Some(due + interval);

        let frame = self.synthesize(&settings);
        self.frame_index += 1;
        Ok(FrameGrab::Complete(frame))
    }

    async fn end(&mut self) -> Result<(), CameraError> {
        self.acquiring = false;
        self.next_due = None;
        Ok(())
    }
}
