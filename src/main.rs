//! Tic Tac Toe - terminal front-end entry point.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tictactoe::{run_tui, Cli, LlmSuggester, MoveSuggester, Orchestrator, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Log to a file; the terminal belongs to the TUI.
    let log_file = std::fs::File::create(&cli.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    info!("Starting tic-tac-toe");

    let settings = Settings::load(cli.config.as_deref())?;
    let suggester: Option<Arc<dyn MoveSuggester>> = settings
        .resolve_provider()
        .map(|config| Arc::new(LlmSuggester::new(config)) as Arc<dyn MoveSuggester>);

    let (orchestrator, ui_tx, view_rx) =
        Orchestrator::new(suggester, Duration::from_millis(cli.delay_ms), cli.seed);

    let engine = tokio::spawn(orchestrator.run());

    let res = run_tui(ui_tx, view_rx).await;

    // The TUI dropped its sender; the orchestrator drains and stops.
    engine.await??;
    res
}
