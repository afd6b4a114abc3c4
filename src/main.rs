use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use stratdesk::cli::{Cli, Command};
use stratdesk::services::log_intents;
use stratdesk::tui::{run_tui, LogBuffer, LogMakeWriter};
use stratdesk::{Config, Dashboard};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    if let Some(Command::Snapshot) = cli.command {
        let desk = Dashboard::new(config);
        println!("{}", serde_json::to_string_pretty(&desk.snapshot())?);
        return Ok(());
    }

    // Logs go to the in-app pane; stdout belongs to the terminal UI
    let log_buffer = Arc::new(LogBuffer::new(config.log_capacity));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(LogMakeWriter::new(log_buffer.clone())),
        )
        .init();

    info!(
        "Starting stratdesk ({:?} variant, {:?} ids)",
        config.variant, config.id_scheme
    );

    let tick_rate = Duration::from_millis(config.tick_ms);
    let desk = Dashboard::new(config);

    tokio::spawn(log_intents(desk.notifier().subscribe()));

    run_tui(desk, log_buffer, tick_rate).await?;

    info!("stratdesk stopped");
    Ok(())
}
