//! Homework bot CLI
//!
//! Command-line entry point for the review status relay.

use std::path::PathBuf;

use clap::Parser;
use homework_bot::{load_config, Config, HomeworkBotBuilder, HomeworkBotError};
use tracing::Level;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Relays homework review status changes to a Telegram chat")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between polls (overrides config file)
    #[arg(long)]
    interval: Option<u64>,

    /// Unix timestamp of the first query window (overrides config file)
    #[arg(long)]
    from_date: Option<u64>,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = parse_log_level)]
    log_level: Level,
}

fn parse_log_level(s: &str) -> Result<Level, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid log level: {}. Use: trace, debug, info, warn, error",
            s
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, interval={:?}, from_date={:?}, log_level={:?}",
        args.config,
        args.interval,
        args.from_date,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.resolve_secrets()?;

    if let Some(interval) = args.interval {
        config.polling.retry_interval_seconds = interval;
    }
    if let Some(from_date) = args.from_date {
        config.polling.initial_from_date = Some(from_date);
    }

    tracing::info!("Starting homework bot");
    tracing::debug!("Configuration: {:?}", config);

    let bot = match HomeworkBotBuilder::new(config).build() {
        Ok(bot) => bot,
        Err(HomeworkBotError::Config(reason)) => {
            // Nothing to retry and no chat to report to
            tracing::error!("Cannot start: {}", reason);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    bot.start().await?;

    Ok(())
}
