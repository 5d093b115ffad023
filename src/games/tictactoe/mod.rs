//! Tic-tac-toe domain types and rules.

mod heuristic;
mod rules;
mod types;

pub use heuristic::best_move;
pub use rules::{available_moves, check_winner, is_full};
pub use types::{Board, Player, Square};

/// Alias for clarity in session management.
pub type Mark = Player;
