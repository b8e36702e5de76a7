//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::pipeline::MAX_FRAME_RATE;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    // Validate value based on key type
    validate_config_value(key, value)?;

    // Load existing config
    let mut config = store.load().await?;

    // Update the appropriate field
    match key {
        "frame_rate" => config.frame_rate = Some(parse_u32(key, value)?),
        "segment_duration" => config.segment_duration = Some(parse_u32(key, value)?),
        "segment_count" => config.segment_count = Some(parse_u32(key, value)?),
        "scale_lower" => config.scale_lower = Some(parse_f64(key, value)?),
        "scale_upper" => config.scale_upper = Some(parse_f64(key, value)?),
        "audio" => config.audio = Some(parse_bool_field(key, value)?),
        "mux" => config.mux = Some(parse_bool_field(key, value)?),
        "audio_sample_rate" => config.audio_sample_rate = Some(parse_u32(key, value)?),
        "audio_chunk_size" => config.audio_chunk_size = Some(parse_u32(key, value)?),
        "audio_channels" => config.audio_channels = Some(parse_u16(key, value)?),
        "memory_threshold_percent" => {
            config.memory_threshold_percent = Some(parse_f32(key, value)?)
        }
        "video_bitrate" => config.video_bitrate = Some(parse_u32(key, value)?),
        "noise_reduction" => config.noise_reduction = Some(parse_bool_field(key, value)?),
        "output_dir" => config.output_dir = Some(value.to_string()),
        _ => unreachable!(), // Already validated
    }

    // Save config
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "frame_rate" => config.frame_rate.map(|v| v.to_string()),
        "segment_duration" => config.segment_duration.map(|v| v.to_string()),
        "segment_count" => config.segment_count.map(|v| v.to_string()),
        "scale_lower" => config.scale_lower.map(|v| v.to_string()),
        "scale_upper" => config.scale_upper.map(|v| v.to_string()),
        "audio" => config.audio.map(|b| b.to_string()),
        "mux" => config.mux.map(|b| b.to_string()),
        "audio_sample_rate" => config.audio_sample_rate.map(|v| v.to_string()),
        "audio_chunk_size" => config.audio_chunk_size.map(|v| v.to_string()),
        "audio_channels" => config.audio_channels.map(|v| v.to_string()),
        "memory_threshold_percent" => config.memory_threshold_percent.map(|v| v.to_string()),
        "video_bitrate" => config.video_bitrate.map(|v| v.to_string()),
        "noise_reduction" => config.noise_reduction.map(|b| b.to_string()),
        "output_dir" => config.output_dir,
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    let unset = || "(not set)".to_string();
    presenter.key_value(
        "frame_rate",
        &config.frame_rate.map(|v| v.to_string()).unwrap_or_else(unset),
    );
    presenter.key_value(
        "segment_duration",
        &config
            .segment_duration
            .map(|v| v.to_string())
            .unwrap_or_else(unset),
    );
    presenter.key_value(
        "segment_count",
        &config
            .segment_count
            .map(|v| v.to_string())
            .unwrap_or_else(unset),
    );
    presenter.key_value(
        "scale_lower",
        &config.scale_lower.map(|v| v.to_string()).unwrap_or_else(unset),
    );
    presenter.key_value(
        "scale_upper",
        &config.scale_upper.map(|v| v.to_string()).unwrap_or_else(unset),
    );
    presenter.key_value(
        "audio",
        &config.audio.map(|b| b.to_string()).unwrap_or_else(unset),
    );
    presenter.key_value(
        "mux",
        &config.mux.map(|b| b.to_string()).unwrap_or_else(unset),
    );
    presenter.key_value(
        "audio_sample_rate",
        &config
            .audio_sample_rate
            .map(|v| v.to_string())
            .unwrap_or_else(unset),
    );
    presenter.key_value(
        "audio_chunk_size",
        &config
            .audio_chunk_size
            .map(|v| v.to_string())
            .unwrap_or_else(unset),
    );
    presenter.key_value(
        "audio_channels",
        &config
            .audio_channels
            .map(|v| v.to_string())
            .unwrap_or_else(unset),
    );
    presenter.key_value(
        "memory_threshold_percent",
        &config
            .memory_threshold_percent
            .map(|v| v.to_string())
            .unwrap_or_else(unset),
    );
    presenter.key_value(
        "video_bitrate",
        &config
            .video_bitrate
            .map(|v| v.to_string())
            .unwrap_or_else(unset),
    );
    presenter.key_value(
        "noise_reduction",
        &config
            .noise_reduction
            .map(|b| b.to_string())
            .unwrap_or_else(unset),
    );
    presenter.key_value(
        "output_dir",
        config.output_dir.as_deref().unwrap_or("(not set)"),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "frame_rate" => {
            let rate = parse_u32(key, value)?;
            if rate == 0 || rate > MAX_FRAME_RATE {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: format!("Value must be between 1 and {}", MAX_FRAME_RATE),
                });
            }
        }
        "segment_duration" | "segment_count" | "audio_sample_rate" | "audio_chunk_size"
        | "video_bitrate" => {
            let v = parse_u32(key, value)?;
            if v == 0 {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be greater than zero".to_string(),
                });
            }
        }
        "audio_channels" => {
            let channels = parse_u16(key, value)?;
            if channels == 0 {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be greater than zero".to_string(),
                });
            }
        }
        "scale_lower" | "scale_upper" => {
            let kelvin = parse_f64(key, value)?;
            if !kelvin.is_finite() || kelvin < 0.0 {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be a non-negative temperature in Kelvin".to_string(),
                });
            }
        }
        "memory_threshold_percent" => {
            let percent = parse_f32(key, value)?;
            if !(0.0..=100.0).contains(&percent) {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be between 0 and 100".to_string(),
                });
            }
        }
        "audio" | "mux" | "noise_reduction" => {
            parse_bool_field(key, value)?;
        }
        _ => {} // output_dir accepts any string
    }
    Ok(())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a whole number".to_string(),
    })
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a whole number".to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a number".to_string(),
    })
}

fn parse_f32(key: &str, value: &str) -> Result<f32, ConfigError> {
    value.parse::<f32>().map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a number".to_string(),
    })
}

fn parse_bool_field(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    })
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}
