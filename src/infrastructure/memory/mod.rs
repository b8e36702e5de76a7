//! Memory monitoring infrastructure module

mod sysinfo_monitor;

pub use sysinfo_monitor::SysinfoMonitor;
