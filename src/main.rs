use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use unread_sync::domain::UserId;
use unread_sync::infrastructure::{AppConfig, CliArgs, ConfigLoader, ReplayReport, ReplayScript, Replayer};

const DEFAULT_USER: &str = "me";

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_directive()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let loader = ConfigLoader::new().unwrap_or_else(|_| ConfigLoader::with_dir(PathBuf::from(".")));
    let mut config = loader.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn print_report(report: &ReplayReport) {
    println!("  {:<24} {:>7}  {}", "CONVERSATION", "UNREAD", "LAST READ");
    for conversation in &report.conversations {
        let unread = conversation.unread();
        println!(
            "{} {:<24} {:>7}  {}",
            if unread.has_unread() { '*' } else { ' ' },
            conversation.id(),
            unread.count,
            unread.last_message_id.as_ref().map_or("-", |id| id.as_str())
        );
    }
    println!("  {:<24} {:>7}", "TOTAL", report.total_unread);
    if report.failed_steps > 0 {
        println!("{} step(s) failed, see log", report.failed_steps);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = unread_sync::VERSION, script = %args.script.display(), "Starting {}", unread_sync::NAME);

    let script = ReplayScript::load(&args.script).await?;
    let user = UserId::new(config.current_user.as_deref().unwrap_or(DEFAULT_USER));
    let replayer = Replayer::new(user, config.read_marker.focus_delay());

    let report = replayer.run(script).await?;
    print_report(&report);

    Ok(())
}
