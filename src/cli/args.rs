//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ThermaCap - segmented radiometric video and audio recorder
#[derive(Parser, Debug)]
#[command(name = "thermacap")]
#[command(version = "0.3.0")]
#[command(about = "Segmented thermal video recording with synchronized audio")]
#[command(long_about = None)]
pub struct Cli {
    /// Capture frame rate in frames per second
    #[arg(short = 'f', long, value_name = "FPS")]
    pub frame_rate: Option<u32>,

    /// Duration of each segment in seconds
    #[arg(short = 'd', long, value_name = "SECS")]
    pub duration: Option<u32>,

    /// Number of segments to record back to back
    #[arg(short = 'p', long, value_name = "N")]
    pub parts: Option<u32>,

    /// Lower radiometric scale limit in Kelvin
    #[arg(long, value_name = "KELVIN")]
    pub scale_lower: Option<f64>,

    /// Upper radiometric scale limit in Kelvin
    #[arg(long, value_name = "KELVIN")]
    pub scale_upper: Option<f64>,

    /// Record video only, with no audio track
    #[arg(long)]
    pub no_audio: bool,

    /// Keep the raw artifacts but skip the combined file
    #[arg(long)]
    pub no_mux: bool,

    /// Video bitrate in bits per second
    #[arg(short = 'b', long, value_name = "BPS")]
    pub bitrate: Option<u32>,

    /// Abort a segment when system memory use exceeds this percentage
    #[arg(long, value_name = "PERCENT")]
    pub memory_threshold: Option<f32>,

    /// Directory the recording artifacts are written to
    #[arg(short = 'o', long, value_name = "DIR", env = "THERMACAP_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "frame_rate",
    "segment_duration",
    "segment_count",
    "scale_lower",
    "scale_upper",
    "audio",
    "mux",
    "audio_sample_rate",
    "audio_chunk_size",
    "audio_channels",
    "memory_threshold_percent",
    "video_bitrate",
    "noise_reduction",
    "output_dir",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
