//! Frame value objects

use chrono::{DateTime, Utc};

/// One unprocessed grid of 16-bit radiometric sensor counts for one instant.
///
/// Produced by the camera port and consumed by the normalizer within the
/// same loop iteration; never retained across iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct RawThermalFrame {
    width: u32,
    height: u32,
    counts: Vec<u16>,
    acquired_at: DateTime<Utc>,
}

impl RawThermalFrame {
    /// Wrap sensor counts for a width x height frame.
    /// Returns None if the buffer length does not match the dimensions.
    pub fn new(width: u32, height: u32, counts: Vec<u16>, acquired_at: DateTime<Utc>) -> Option<Self> {
        if counts.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            counts,
            acquired_at,
        })
    }

    /// Frame with every pixel at the same count, for tests and synthesis
    pub fn uniform(width: u32, height: u32, count: u16) -> Self {
        Self {
            width,
            height,
            counts: vec![count; (width as usize) * (height as usize)],
            acquired_at: Utc::now(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn counts(&self) -> &[u16] {
        &self.counts
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }
}

/// The 8-bit, 3-channel display-ready version of a [`RawThermalFrame`].
///
/// Grayscale broadcast across R, G and B so standard video encoders accept
/// it without a colorspace conversion step.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFrame {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl NormalizedFrame {
    pub(crate) fn from_gray(width: u32, height: u32, gray: impl Iterator<Item = u8>) -> Self {
        let mut rgb = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for value in gray {
            rgb.extend_from_slice(&[value, value, value]);
        }
        Self { width, height, rgb }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved RGB24 bytes, row-major, length = width * height * 3
    pub fn data(&self) -> &[u8] {
        &self.rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_buffer() {
        assert!(RawThermalFrame::new(4, 4, vec![0; 15], Utc::now()).is_none());
        assert!(RawThermalFrame::new(4, 4, vec![0; 16], Utc::now()).is_some());
    }

    #[test]
    fn uniform_fills_every_pixel() {
        let frame = RawThermalFrame::uniform(3, 2, 777);
        assert_eq!(frame.counts().len(), 6);
        assert!(frame.counts().iter().all(|&c| c == 777));
    }

    #[test]
    fn normalized_frame_broadcasts_three_channels() {
        let frame = NormalizedFrame::from_gray(2, 1, [10u8, 200].into_iter());
        assert_eq!(frame.data(), &[10, 10, 10, 200, 200, 200]);
        assert_eq!(frame.data().len(), 2 * 1 * 3);
    }
}
