//! Raw radiometric count to display pixel normalization

use crate::domain::capture::frame::{NormalizedFrame, RawThermalFrame};

/// Sensor counts per Kelvin in linear radiometric mode (0.01 K resolution)
pub const COUNTS_PER_KELVIN: f64 = 100.0;

/// Linear mapping from raw radiometric counts onto the displayable 0-255
/// range. Offset and gain are derived once from the configured scale limits
/// and reused for every sample of every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiometricScale {
    offset: f64,
    gain: f64,
}

impl RadiometricScale {
    /// Derive the mapping from scale limits in Kelvin.
    /// Callers guarantee `scale_lower < scale_upper` (pipeline validation).
    pub fn new(scale_lower: f64, scale_upper: f64) -> Self {
        let offset = scale_lower * COUNTS_PER_KELVIN;
        let gain = 255.0 / ((scale_upper - scale_lower) * COUNTS_PER_KELVIN);
        Self { offset, gain }
    }

    /// Map one raw count onto 0-255. Pure, monotonic non-decreasing, and
    /// clamped: out-of-range counts saturate rather than wrap.
    pub fn normalize(&self, sample: u16) -> u8 {
        let value = (f64::from(sample) - self.offset) * self.gain;
        value.round().clamp(0.0, 255.0) as u8
    }

    /// Normalize a whole frame, broadcasting the gray value to 3 channels
    pub fn normalize_frame(&self, raw: &RawThermalFrame) -> NormalizedFrame {
        NormalizedFrame::from_gray(
            raw.width(),
            raw.height(),
            raw.counts().iter().map(|&c| self.normalize(c)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_scale() -> RadiometricScale {
        RadiometricScale::new(290.0, 310.0)
    }

    #[test]
    fn midpoint_of_scale_maps_to_midgray() {
        let scale = default_scale();
        // 300.0 K at 100 counts/K
        let value = scale.normalize(30_000);
        assert!((127..=129).contains(&value), "midpoint mapped to {}", value);
    }

    #[test]
    fn scale_limits_map_to_extremes() {
        let scale = default_scale();
        assert_eq!(scale.normalize(29_000), 0);
        assert_eq!(scale.normalize(31_000), 255);
    }

    #[test]
    fn out_of_range_counts_clamp() {
        let scale = default_scale();
        assert_eq!(scale.normalize(0), 0);
        assert_eq!(scale.normalize(u16::MAX), 255);
    }

    #[test]
    fn monotonic_over_full_input_range() {
        let scale = default_scale();
        let mut previous = scale.normalize(0);
        for sample in 1..=u16::MAX {
            let current = scale.normalize(sample);
            assert!(
                current >= previous,
                "normalize({}) = {} < normalize({}) = {}",
                sample,
                current,
                sample - 1,
                previous
            );
            previous = current;
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let scale = RadiometricScale::new(250.0, 400.0);
        for sample in [0u16, 12_345, 30_000, u16::MAX] {
            assert_eq!(scale.normalize(sample), scale.normalize(sample));
        }
    }

    #[test]
    fn uniform_midpoint_frame_normalizes_uniformly() {
        let scale = default_scale();
        let raw = RawThermalFrame::uniform(8, 4, 30_000);
        let normalized = scale.normalize_frame(&raw);
        assert_eq!(normalized.width(), 8);
        assert_eq!(normalized.height(), 4);
        let expected = scale.normalize(30_000);
        assert!(normalized.data().iter().all(|&b| b == expected));
    }

    #[test]
    fn narrow_scale_still_spans_full_range() {
        let scale = RadiometricScale::new(299.0, 301.0);
        assert_eq!(scale.normalize(29_900), 0);
        assert_eq!(scale.normalize(30_100), 255);
        let mid = scale.normalize(30_000);
        assert!((127..=129).contains(&mid));
    }
}
