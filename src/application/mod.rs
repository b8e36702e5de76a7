//! Application layer - Use cases and port interfaces
//!
//! Contains the core capture orchestration and trait definitions
//! for external system interactions.

pub mod ports;
pub mod scheduler;

// Re-export the recording use case
pub use scheduler::{
    RunReport, ScheduleError, SchedulerCallbacks, SchedulerState, SegmentOutcome,
    SegmentScheduler,
};
