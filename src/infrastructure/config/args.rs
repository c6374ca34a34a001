use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "unread-sync",
    version,
    about = "Replays a chat session through the unread reconciliation engine",
    long_about = None
)]
/// Command line arguments.
pub struct CliArgs {
    /// Session script (JSON) to replay.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Identifier of the signed-in user.
    #[arg(short, long, env = "UNREAD_SYNC_USER")]
    pub user: Option<String>,

    /// Milliseconds between focus regain and marking read.
    #[arg(long)]
    pub focus_delay_ms: Option<u64>,
}
