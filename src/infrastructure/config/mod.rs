//! Application configuration.

/// Configuration file model.
pub mod app_config;
/// Command line arguments.
pub mod args;
/// Configuration file discovery and parsing.
pub mod loader;

pub use app_config::{AppConfig, LogLevel, ReadMarkerConfig};
pub use args::CliArgs;
pub use loader::{ConfigError, ConfigLoader};
