//! Move suggestion service boundary.
//!
//! The session engine treats move suggestion as an external collaborator:
//! anything implementing [`MoveSuggester`] may recommend a cell for the
//! automated player. The LLM-backed implementation renders the board into a
//! prompt, asks for a single integer, and rejects any answer that is not an
//! open cell. Callers fall back to the local heuristic on every error.

mod client;

pub use client::{CompletionClient, Provider, ProviderConfig};

use crate::games::tictactoe::{Board, Player, Square};
use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// Recommends a move for the automated player.
#[async_trait]
pub trait MoveSuggester: Send + Sync {
    /// Suggests an open cell index (0-8) for `mark` on `board`.
    ///
    /// Any error is recoverable: the caller substitutes the local heuristic.
    async fn suggest(&self, board: &Board, mark: Player) -> Result<usize, SuggestError>;
}

/// Move suggestion error.
#[derive(Debug, Clone, Display, Error)]
#[display("Suggestion error: {} at {}:{}", message, file, line)]
pub struct SuggestError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl SuggestError {
    /// Creates a new suggestion error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// LLM-backed move suggester.
#[derive(Debug, Clone)]
pub struct LlmSuggester {
    client: CompletionClient,
}

impl LlmSuggester {
    /// Creates a suggester backed by the given provider.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: CompletionClient::new(config),
        }
    }
}

#[async_trait]
impl MoveSuggester for LlmSuggester {
    #[instrument(skip(self, board))]
    async fn suggest(&self, board: &Board, mark: Player) -> Result<usize, SuggestError> {
        let reply = self
            .client
            .generate(SYSTEM_PROMPT, &build_prompt(board, mark))
            .await?;

        debug!(reply = %reply, "Parsing suggestion reply");
        let pos = parse_reply(&reply).ok_or_else(|| {
            SuggestError::new(format!("No integer in suggestion reply: {}", reply))
        })?;

        validate(board, pos)
    }
}

const SYSTEM_PROMPT: &str =
    "You are an expert tic tac toe AI. Only respond with the move cell index.";

/// Renders the board as the prompt grid: `X`, `O`, or `.` per cell.
fn render_grid(board: &Board) -> String {
    let mut grid = String::new();
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| match board.get(row * 3 + col) {
                Some(Square::Occupied(player)) => player.to_string(),
                _ => ".".to_string(),
            })
            .collect();
        grid.push_str(&cells.join(" "));
        if row < 2 {
            grid.push('\n');
        }
    }
    grid
}

/// Builds the user prompt asking for a single cell index.
fn build_prompt(board: &Board, mark: Player) -> String {
    format!(
        "You are an expert tic tac toe player. You play as '{mark}' and the user is \
         your opponent.\n\
         The board uses 0-based indexes. Format:\n\
         0 1 2\n3 4 5\n6 7 8\n\
         The current board (X = X, O = O, . = empty):\n{grid}\n\n\
         What cell (number 0 to 8) should '{mark}' play to maximize their chance of \
         winning? DO NOT add commentary, explain, or provide anything except a single \
         integer for your answer. Only reply with a single number for the cell index.",
        grid = render_grid(board),
    )
}

/// Extracts the first integer substring from a free-text reply.
fn parse_reply(reply: &str) -> Option<usize> {
    let digits: String = reply
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Checks that a suggested index is in range and currently open.
fn validate(board: &Board, pos: usize) -> Result<usize, SuggestError> {
    if pos > 8 {
        return Err(SuggestError::new(format!(
            "Suggested cell {} out of range",
            pos
        )));
    }
    if !board.is_empty(pos) {
        return Err(SuggestError::new(format!(
            "Suggested cell {} is occupied",
            pos
        )));
    }
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(parse_reply("5"), Some(5));
    }

    #[test]
    fn test_parse_with_prefix_text() {
        assert_eq!(parse_reply("Cell: 3"), Some(3));
        assert_eq!(parse_reply("I would play 7."), Some(7));
    }

    #[test]
    fn test_parse_takes_first_integer() {
        assert_eq!(parse_reply("4, not 8"), Some(4));
        assert_eq!(parse_reply("12 is my pick"), Some(12));
    }

    #[test]
    fn test_parse_no_integer() {
        assert_eq!(parse_reply("the center square"), None);
        assert_eq!(parse_reply(""), None);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let board = Board::new();
        assert!(validate(&board, 9).is_err());
        assert!(validate(&board, 12).is_err());
    }

    #[test]
    fn test_validate_rejects_occupied() {
        let mut board = Board::new();
        board.set(4, Square::Occupied(Player::X)).unwrap();
        assert!(validate(&board, 4).is_err());
        assert_eq!(validate(&board, 0).unwrap(), 0);
    }

    #[test]
    fn test_grid_rendering() {
        let mut board = Board::new();
        board.set(0, Square::Occupied(Player::X)).unwrap();
        board.set(4, Square::Occupied(Player::O)).unwrap();
        assert_eq!(render_grid(&board), "X . .\n. O .\n. . .");
    }

    #[test]
    fn test_prompt_mentions_mark_and_grid() {
        let board = Board::new();
        let prompt = build_prompt(&board, Player::O);
        assert!(prompt.contains("'O'"));
        assert!(prompt.contains(". . .\n. . .\n. . ."));
    }
}
