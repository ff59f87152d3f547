// src/main.rs

//! feedloop CLI
//!
//! Always-on service entry point plus one-shot maintenance commands.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use feedloop::{
    error::{AppError, Result},
    models::Config,
    pipeline::IngestionJob,
    scheduler::Scheduler,
    server,
    services::{OpenAiClassifier, RssFeedSource, SmtpNotifier},
    store::SqliteStore,
    utils::http,
};

/// feedloop - RSS ingestion and summary service
#[derive(Parser, Debug)]
#[command(
    name = "feedloop",
    version,
    about = "Polls an RSS feed, classifies new entries, and emails a summary"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "feedloop.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the service: scheduler plus liveness endpoint (default)
    Serve,

    /// Execute a single ingestion run and exit
    Run,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

/// Main entry point.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Validate => {
            tracing::info!("Configuration OK");
        }
        Command::Run => {
            let job = build_job(&config).await?;
            let outcome = job.run().await?;
            tracing::info!("Run finished: {} new entries", outcome.created);
        }
        Command::Serve => serve(config).await?,
    }

    Ok(())
}

/// Wire the ingestion job from configuration.
async fn build_job(config: &Config) -> Result<IngestionJob> {
    let client = http::create_async_client(&config.http)?;
    let store = SqliteStore::connect(&config.store.database_url).await?;
    let feed = RssFeedSource::new(client.clone(), config.feed.url.clone());
    let classifier = OpenAiClassifier::new(client, &config.classifier);
    let notifier = SmtpNotifier::new(&config.mail)?;

    Ok(IngestionJob::new(
        Arc::new(feed),
        Arc::new(classifier),
        Arc::new(store),
        Arc::new(notifier),
        config.retry.clone(),
        Duration::from_secs(config.scheduler.interval_secs),
    ))
}

/// Run scheduler and liveness endpoint until shutdown.
async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .map_err(|e| AppError::config(format!("invalid server.bind_addr: {e}")))?;

    let job = build_job(&config).await?;

    tracing::info!(
        "Starting scheduler: ingestion every {} seconds",
        config.scheduler.interval_secs
    );
    let mut scheduler = Scheduler::new().with_job(job);
    scheduler.start();

    server::serve(addr).await?;

    scheduler.stop();
    tracing::info!("feedloop shut down");
    Ok(())
}
