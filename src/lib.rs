//! Tic-tac-toe session engine with an optional LLM-assisted opponent.
//!
//! # Architecture
//!
//! - **Games**: pure board types and rules (win, draw, available moves)
//! - **Heuristic**: win/block/positional move selection with injectable RNG
//! - **Suggest**: move suggestion service boundary (OpenAI or Anthropic);
//!   every failure falls back to the heuristic
//! - **Session**: the state machine driving mode selection, play, game over
//!   and reset, with a staleness guard for in-flight automated moves
//! - **Orchestrator**: async coordination between UI events, the session and
//!   move acquisition
//! - **TUI**: ratatui front-end consuming session snapshots
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tictactoe::{Mode, Orchestrator, UiEvent};
//!
//! # async fn example() {
//! let (orchestrator, ui_tx, mut view_rx) = Orchestrator::new(None, Duration::ZERO, None);
//! tokio::spawn(orchestrator.run());
//!
//! ui_tx.send(UiEvent::SelectMode(Mode::VsComputer)).ok();
//! ui_tx.send(UiEvent::ClickCell(4)).ok();
//! while let Some(view) = view_rx.recv().await {
//!     println!("{}", view.message);
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod games;
mod orchestrator;
mod session;
mod suggest;
mod tui;

// Crate-level exports - CLI
pub use cli::Cli;

// Crate-level exports - Configuration
pub use config::{ConfigError, Settings};

// Crate-level exports - Orchestration
pub use orchestrator::{Orchestrator, UiSender, ViewReceiver};

// Crate-level exports - Session state machine
pub use session::{AiRequest, Mode, Phase, Session, SessionView, UiEvent};

// Crate-level exports - Move suggestion service
pub use suggest::{
    CompletionClient, LlmSuggester, MoveSuggester, Provider, ProviderConfig, SuggestError,
};

// Crate-level exports - Game types and rules
pub use games::tictactoe::{
    available_moves, best_move, check_winner, is_full, Board, Mark, Player, Square,
};

// Crate-level exports - Terminal front-end
pub use tui::run_tui;
