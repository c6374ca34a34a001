//! Infrastructure layer with adapters and the replay tool.

/// Backend gateway adapters.
pub mod backend;
/// Application configuration.
pub mod config;
/// Scripted session replay.
pub mod replay;
/// On-screen conversation tracking.
pub mod viewport;

pub use backend::InMemoryBackend;
pub use config::{AppConfig, CliArgs, ConfigError, ConfigLoader, LogLevel, ReadMarkerConfig};
pub use replay::{ReplayReport, ReplayScript, ReplayStep, Replayer, ScriptError};
pub use viewport::Viewport;
