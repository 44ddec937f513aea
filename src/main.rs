use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beacon::config::{Config, DEFAULT_CONFIG_PATH};
use beacon::discord::{DiscordBot, DiscordSink};
use beacon::reconciler::Reconciler;
use beacon::scheduler::Scheduler;

#[derive(Parser)]
#[command(
    name = "beacon",
    version,
    about = "Keeps a Discord embed up to date with Minecraft server status",
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "BEACON_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json); overrides logging.format
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);

    let (level, format) = match &loaded {
        Ok(config) => (config.logging.level.clone(), config.logging.format.clone()),
        Err(_) => ("info".to_string(), "text".to_string()),
    };
    let format = cli.log_format.clone().unwrap_or(format);
    setup_tracing(&format, &level, cli.verbose)?;

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %cli.config.display(), error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    tracing::info!(
        servers = config.servers().count(),
        groups = config.groups.len(),
        interval_secs = config.status.interval_secs,
        record = %config.storage.record_path.display(),
        "beacon starting"
    );

    let sink = DiscordSink::from_token(&config.discord.token, config.discord.channel_id);
    let reconciler = Reconciler::from_config(&config, Arc::new(sink))?;
    let scheduler = Scheduler::new(Arc::new(reconciler), config.interval());
    let bot = DiscordBot::new(config.discord.token.clone(), scheduler.clone());

    tokio::select! {
        () = bot.run() => {
            tracing::info!("Discord client exited");
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        }
    }

    scheduler.stop();
    bot.shutdown().await;

    tracing::info!("beacon stopped");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("beacon=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("beacon={level},warn"))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("beacon=info,warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
    }

    Ok(())
}
