//! System memory monitor port interface

/// Port for the memory-pressure failsafe. Polled once per frame-loop
/// iteration; readings above the configured threshold soft-abort the
/// current segment only.
pub trait MemoryMonitor: Send {
    /// System RAM in use, as a percentage in 0.0..=100.0
    fn percent_used(&mut self) -> f32;
}
