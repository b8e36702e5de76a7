//! System memory polling using sysinfo

use sysinfo::System;

use crate::application::ports::MemoryMonitor;

/// Reads whole-system memory pressure; polled once per capture iteration
pub struct SysinfoMonitor {
    system: System,
}

impl SysinfoMonitor {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        Self { system }
    }
}

impl Default for SysinfoMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMonitor for SysinfoMonitor {
    fn percent_used(&mut self) -> f32 {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return 0.0;
        }
        (self.system.used_memory() as f32 / total as f32) * 100.0
    }
}
