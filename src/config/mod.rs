//! Configuration management for perftransform

pub mod config;
pub mod output;
pub mod plugins;
pub mod processing;


// Re-export main types for convenience
pub use config::{Config, DEFAULT_CONFIG_FILES};
pub use output::{OutputConfig, OutputFormat};
pub use plugins::PluginConfig;
pub use processing::ProcessingConfig;
