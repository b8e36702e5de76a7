//! CLI presenter for output formatting

use std::sync::Mutex;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Presenter for CLI output formatting.
///
/// Owns the per-segment frame progress bar and the mux spinner behind
/// interior mutability, so the scheduler callbacks can drive one shared
/// instance.
pub struct Presenter {
    spinner: Mutex<Option<ProgressBar>>,
    progress: Mutex<Option<ProgressBar>>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            progress: Mutex::new(None),
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&self, message: &str) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_with_message(format!("{} {}", "✓".green(), message));
            }
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&self, message: &str) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_with_message(format!("{} {}", "✗".red(), message));
            }
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
    }

    /// Start the frame progress bar for one segment
    pub fn start_capture_progress(&self, total_frames: u32) {
        let bar = ProgressBar::new(u64::from(total_frames));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:20.cyan} {pos}/{len} frames")
                .unwrap(),
        );
        if let Ok(mut slot) = self.progress.lock() {
            *slot = Some(bar);
        }
    }

    /// Advance the frame progress bar
    pub fn update_capture_progress(&self, frames_done: u32) {
        if let Ok(slot) = self.progress.lock() {
            if let Some(ref bar) = *slot {
                bar.set_position(u64::from(frames_done));
            }
        }
    }

    /// Clear the frame progress bar; safe to call when none is active
    pub fn finish_capture_progress(&self) {
        if let Ok(mut slot) = self.progress.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (artifact paths and summaries)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
