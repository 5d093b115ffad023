//! Command-line interface for the tic-tac-toe front-end.

use clap::Parser;
use std::path::PathBuf;

/// Tic Tac Toe - terminal game with an optional LLM-assisted opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Tic-tac-toe with a heuristic or LLM-assisted computer opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML settings file for the suggestion service
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Thinking delay before the computer's move lands, in milliseconds
    #[arg(long, default_value = "600")]
    pub delay_ms: u64,

    /// Seed for the heuristic's random tie-breaking
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log file path (the terminal is owned by the TUI)
    #[arg(long, default_value = "tictactoe.log")]
    pub log_file: PathBuf,
}
