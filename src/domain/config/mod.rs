//! Configuration value objects

pub mod app_config;
pub mod pipeline;

pub use app_config::AppConfig;
pub use pipeline::PipelineConfig;
