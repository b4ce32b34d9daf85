use clap::{Parser, ValueEnum};
use serenity::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use tallybot::ai::GeminiClient;
use tallybot::clock::Clock;
use tallybot::config::BotConfig;
use tallybot::discord::{self, Handler};
use tallybot::dispatch::{DispatchSettings, Dispatcher};
use tallybot::store::BotState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Discord AI chat, counting game and support ticket bot.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the YAML configuration file (optional)
    #[arg(long, env = "TALLYBOT_CONFIG", default_value = "tallybot.yaml")]
    config: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    info!("Starting Tallybot");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = BotConfig::load(Some(&args.config))?;
    config.validate()?;
    info!(
        prefix = %config.discord.prefix,
        model = %config.ai.model,
        max_requests = config.rate_limiting.max_requests,
        window_secs = config.rate_limiting.window_secs,
        "Configuration loaded"
    );

    let state = BotState::new(config.rate_limiting.quota());
    info!("Rate limiter and counting games initialized");

    if let Some(interval) = config.rate_limiting.sweep_interval() {
        tokio::spawn(run_sweeper(Arc::clone(&state), interval));
    }

    let generator = Arc::new(GeminiClient::new(&config.ai)?);
    let dispatcher = Arc::new(Dispatcher::new(
        state,
        generator,
        DispatchSettings::from(&config),
    ));

    let mut client = Client::builder(&config.discord.token, discord::intents())
        .event_handler(Handler::new(dispatcher))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection");
    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("Tallybot stopped");
    Ok(())
}

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true);

    match args.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Periodically drop rate-limit history that can no longer affect a decision.
async fn run_sweeper<C: Clock>(state: Arc<BotState<C>>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let removed = state.limiter().sweep();
        debug!(
            removed,
            tracked = state.limiter().actor_count(),
            "Swept rate limiter"
        );
    }
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
