mod commands;
mod driver;

use clap::{Parser, Subcommand};
use quizcast_core::config::{self, LoggingConfig};
use std::path::Path;
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(
    name = "quizcast",
    version,
    about = "Daily quiz polls from a plain-text question bank",
    long_about = "Sends the next batch of quiz questions as Telegram polls and records \
                  progress. Meant to be triggered by cron or a CI schedule; runs sharing \
                  one cursor must never overlap."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the next batch (default).
    Run {
        /// Log what would be sent without sending or moving the cursor.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show bank size, cursor, and destinations.
    Status,
    /// Parse the bank and report questions with no matching answer.
    Check {
        /// Exit non-zero if any question has no correct option.
        #[arg(long)]
        strict: bool,
    },
    /// Overwrite the cursor.
    Reset {
        /// New cursor value, clamped to the bank size.
        #[arg(long, default_value_t = 0)]
        to: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _guard = init_logging(&cfg.logging)?;
    if let Some(notice) = defaults_notice(&cli.config) {
        info!("{notice}");
    }

    match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => commands::run(&cfg, dry_run).await,
        Commands::Status => commands::status(&cfg, &cli.config).await,
        Commands::Check { strict } => commands::check(&cfg, strict),
        Commands::Reset { to } => commands::reset(&cfg, to).await,
    }
}

/// Install the stdout subscriber, plus a file layer when `log_dir` is set.
///
/// The returned guard flushes the file writer on drop.
fn init_logging(
    cfg: &LoggingConfig,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&cfg.log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let (file_layer, guard) = if cfg.log_dir.is_empty() {
        (None, None)
    } else {
        std::fs::create_dir_all(&cfg.log_dir)?;
        let appender = tracing_appender::rolling::never(&cfg.log_dir, "quizcast.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Logged once logging is up, since `config::load` runs before it.
fn defaults_notice(config_path: &str) -> Option<String> {
    (!Path::new(config_path).exists())
        .then(|| format!("Config file not found at {config_path}, using defaults"))
}
