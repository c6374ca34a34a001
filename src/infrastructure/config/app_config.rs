//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_directive())
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go nowhere when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Identifier of the signed-in user; their own messages are never tracked.
    #[serde(default)]
    pub current_user: Option<String>,

    /// Deferred read marker configuration.
    #[serde(default)]
    pub read_marker: ReadMarkerConfig,
}

/// Deferred read marker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadMarkerConfig {
    /// Milliseconds between focus regain and marking the conversation read.
    #[serde(default = "default_focus_delay_ms")]
    pub focus_delay_ms: u64,
}

impl ReadMarkerConfig {
    /// Delay as a [`Duration`].
    #[must_use]
    pub const fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }
}

impl Default for ReadMarkerConfig {
    fn default() -> Self {
        Self {
            focus_delay_ms: default_focus_delay_ms(),
        }
    }
}

fn default_focus_delay_ms() -> u64 {
    2000
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(user) = &args.user {
            self.current_user = Some(user.clone());
        }
        if let Some(focus_delay_ms) = args.focus_delay_ms {
            self.read_marker.focus_delay_ms = focus_delay_ms;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            current_user: None,
            read_marker: ReadMarkerConfig::default(),
        }
    }
}
