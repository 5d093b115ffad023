//! Game session state machine.
//!
//! A [`Session`] owns the whole in-memory game state: board, mode, phase,
//! turn, winner, status message and the "thinking" flag. UI events feed
//! [`Session::handle`]; after every board mutation the session re-evaluates
//! terminal conditions and, when it is the automated player's turn, emits an
//! [`AiRequest`] for the orchestrator to resolve asynchronously. The request
//! carries a board snapshot and a staleness token so a result computed
//! against an old board is discarded rather than applied.

use crate::games::tictactoe::{available_moves, check_winner, Board, Player, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Play mode chosen at the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Human (X) against the computer (O).
    #[strum(serialize = "Vs Computer")]
    VsComputer,
    /// Two humans sharing the keyboard.
    #[strum(serialize = "Two Player")]
    TwoPlayer,
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting at the mode menu.
    NotStarted,
    /// Game in progress.
    Playing,
    /// Game ended with a winner or a draw.
    GameOver,
}

/// UI events consumed by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Start a game in the given mode.
    SelectMode(Mode),
    /// Click the cell at the given index (0-8).
    ClickCell(usize),
    /// Clear the board, keeping the mode.
    Reset,
    /// Back to the mode menu.
    NewGame,
}

/// A pending automated-move acquisition.
///
/// The board snapshot and epoch key the request: the result is applied only
/// if the session board is still exactly the one the request was issued for.
#[derive(Debug, Clone)]
pub struct AiRequest {
    /// Board as it looked when the request was issued.
    pub board: Board,
    /// The automated player's mark.
    pub mark: Player,
    /// Staleness token; bumped on every board mutation.
    pub epoch: u64,
}

/// Read-only snapshot of session state for the UI.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// Current board.
    pub board: Board,
    /// Selected mode, if any.
    pub mode: Option<Mode>,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Which mark moves next.
    pub to_move: Player,
    /// Winner, once a winning line exists.
    pub winner: Option<Player>,
    /// Human-readable status line.
    pub message: String,
    /// True while an automated move is being acquired.
    pub thinking: bool,
}

const MSG_CHOOSE_MODE: &str = "Choose a mode to start";
const MSG_DRAW: &str = "It's a draw!";

/// The session state machine.
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    mode: Option<Mode>,
    phase: Phase,
    to_move: Player,
    winner: Option<Player>,
    message: String,
    ai_busy: bool,
    assisted: bool,
    suggestion_enabled: bool,
    epoch: u64,
}

impl Session {
    /// Creates a fresh session.
    ///
    /// `suggestion_enabled` marks whether a move suggestion service is
    /// configured; in computer mode it labels the opponent as assisted.
    #[instrument]
    pub fn new(suggestion_enabled: bool) -> Self {
        Self {
            board: Board::new(),
            mode: None,
            phase: Phase::NotStarted,
            to_move: Player::X,
            winner: None,
            message: MSG_CHOOSE_MODE.to_string(),
            ai_busy: false,
            assisted: false,
            suggestion_enabled,
            epoch: 0,
        }
    }

    /// Returns a snapshot for the UI.
    pub fn view(&self) -> SessionView {
        SessionView {
            board: self.board.clone(),
            mode: self.mode,
            phase: self.phase,
            to_move: self.to_move,
            winner: self.winner,
            message: self.message.clone(),
            thinking: self.ai_busy,
        }
    }

    /// Handles a UI event.
    ///
    /// Returns an [`AiRequest`] when the event put the automated player on
    /// the clock. Invalid events (occupied cell, out of turn, wrong phase)
    /// are silently ignored.
    #[instrument(skip(self))]
    pub fn handle(&mut self, event: UiEvent) -> Option<AiRequest> {
        match event {
            UiEvent::SelectMode(mode) => self.select_mode(mode),
            UiEvent::ClickCell(pos) => self.click_cell(pos),
            UiEvent::Reset => self.reset(),
            UiEvent::NewGame => self.new_game(),
        }
    }

    /// Applies a resolved automated move, unless it went stale.
    ///
    /// The move is discarded when the board changed since the request was
    /// issued (reset or new game while the move was in flight).
    #[instrument(skip(self, request), fields(epoch = request.epoch))]
    pub fn apply_automated(&mut self, request: &AiRequest, pos: usize) -> Option<AiRequest> {
        if request.epoch != self.epoch || request.board != self.board {
            debug!(current_epoch = self.epoch, "Discarding stale automated move");
            return None;
        }
        if self.phase != Phase::Playing
            || self.mode != Some(Mode::VsComputer)
            || self.to_move != request.mark
        {
            debug!(phase = ?self.phase, "Automated move no longer applicable");
            return None;
        }
        if !self.place(pos, request.mark) {
            // The resolver validated the cell; reaching this means it broke
            // its contract. Drop the move rather than corrupt the board.
            warn!(pos, "Automated move targeted an unusable cell");
            self.ai_busy = false;
            return None;
        }

        self.to_move = request.mark.opponent();
        self.ai_busy = false;
        self.evaluate()
    }

    fn select_mode(&mut self, mode: Mode) -> Option<AiRequest> {
        if self.phase != Phase::NotStarted {
            debug!(phase = ?self.phase, "Ignoring mode selection mid-session");
            return None;
        }

        self.board = Board::new();
        self.mode = Some(mode);
        self.phase = Phase::Playing;
        self.to_move = Player::X;
        self.winner = None;
        self.ai_busy = false;
        self.assisted = self.suggestion_enabled && mode == Mode::VsComputer;
        self.epoch += 1;
        self.evaluate()
    }

    fn click_cell(&mut self, pos: usize) -> Option<AiRequest> {
        if self.phase != Phase::Playing || self.winner.is_some() {
            debug!(pos, "Ignoring click outside play");
            return None;
        }
        if self.mode == Some(Mode::VsComputer) && self.to_move != Player::X {
            debug!(pos, "Ignoring click during the computer's turn");
            return None;
        }
        let mover = self.to_move;
        if !self.place(pos, mover) {
            debug!(pos, "Ignoring click on an occupied cell");
            return None;
        }

        self.to_move = mover.opponent();
        self.evaluate()
    }

    fn reset(&mut self) -> Option<AiRequest> {
        if self.mode.is_none() {
            return None;
        }

        debug!("Resetting board");
        self.board = Board::new();
        self.phase = Phase::Playing;
        self.to_move = Player::X;
        self.winner = None;
        self.ai_busy = false;
        self.epoch += 1;
        self.evaluate()
    }

    fn new_game(&mut self) -> Option<AiRequest> {
        debug!("Returning to mode menu");
        self.board = Board::new();
        self.mode = None;
        self.phase = Phase::NotStarted;
        self.to_move = Player::X;
        self.winner = None;
        self.ai_busy = false;
        self.assisted = false;
        self.epoch += 1;
        self.message = MSG_CHOOSE_MODE.to_string();
        None
    }

    /// Places a mark, bumping the epoch. False if the cell is unusable.
    fn place(&mut self, pos: usize, mark: Player) -> bool {
        if !self.board.is_empty(pos) {
            return false;
        }
        if self.board.set(pos, Square::Occupied(mark)).is_err() {
            return false;
        }
        self.epoch += 1;
        true
    }

    /// Re-evaluates terminal conditions after a board mutation.
    ///
    /// Emits an [`AiRequest`] when the game continues and it is the
    /// automated player's turn.
    fn evaluate(&mut self) -> Option<AiRequest> {
        if let Some(winner) = check_winner(&self.board) {
            self.winner = Some(winner);
            self.phase = Phase::GameOver;
            self.ai_busy = false;
            self.message = self.win_message(winner);
            return None;
        }

        if available_moves(&self.board).is_empty() {
            self.phase = Phase::GameOver;
            self.winner = None;
            self.ai_busy = false;
            self.message = MSG_DRAW.to_string();
            return None;
        }

        if self.mode == Some(Mode::VsComputer) && self.to_move == Player::O {
            if self.ai_busy {
                // Exactly one automated move may be pending.
                return None;
            }
            self.ai_busy = true;
            self.message = self.thinking_message();
            return Some(AiRequest {
                board: self.board.clone(),
                mark: Player::O,
                epoch: self.epoch,
            });
        }

        self.message = self.turn_message();
        None
    }

    fn turn_message(&self) -> String {
        match self.mode {
            Some(Mode::VsComputer) => {
                if self.assisted {
                    "Your turn (X) [vs LLM]".to_string()
                } else {
                    "Your turn (X)".to_string()
                }
            }
            Some(Mode::TwoPlayer) => format!("Player {}'s turn", self.to_move),
            None => MSG_CHOOSE_MODE.to_string(),
        }
    }

    fn win_message(&self, winner: Player) -> String {
        match self.mode {
            Some(Mode::VsComputer) => match winner {
                Player::X => "You win!".to_string(),
                Player::O => {
                    if self.assisted {
                        "LLM wins!".to_string()
                    } else {
                        "Computer wins!".to_string()
                    }
                }
            },
            _ => format!("Player {} wins!", winner),
        }
    }

    fn thinking_message(&self) -> String {
        if self.assisted {
            "LLM is thinking...".to_string()
        } else {
            "Computer is thinking...".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_at_menu() {
        let session = Session::new(false);
        let view = session.view();
        assert_eq!(view.phase, Phase::NotStarted);
        assert_eq!(view.mode, None);
        assert_eq!(view.message, MSG_CHOOSE_MODE);
    }

    #[test]
    fn test_select_mode_starts_play() {
        let mut session = Session::new(false);
        let request = session.handle(UiEvent::SelectMode(Mode::TwoPlayer));
        assert!(request.is_none());

        let view = session.view();
        assert_eq!(view.phase, Phase::Playing);
        assert_eq!(view.to_move, Player::X);
        assert!(view.board.squares().iter().all(|s| *s == Square::Empty));
    }

    #[test]
    fn test_mode_selection_ignored_mid_game() {
        let mut session = Session::new(false);
        session.handle(UiEvent::SelectMode(Mode::TwoPlayer));
        session.handle(UiEvent::ClickCell(0));
        assert!(session.handle(UiEvent::SelectMode(Mode::VsComputer)).is_none());
        assert_eq!(session.view().mode, Some(Mode::TwoPlayer));
    }

    #[test]
    fn test_human_move_flips_turn() {
        let mut session = Session::new(false);
        session.handle(UiEvent::SelectMode(Mode::TwoPlayer));
        session.handle(UiEvent::ClickCell(4));
        let view = session.view();
        assert_eq!(view.board.get(4), Some(Square::Occupied(Player::X)));
        assert_eq!(view.to_move, Player::O);
        assert_eq!(view.message, "Player O's turn");
    }

    #[test]
    fn test_computer_turn_emits_request() {
        let mut session = Session::new(false);
        session.handle(UiEvent::SelectMode(Mode::VsComputer));
        let request = session.handle(UiEvent::ClickCell(0)).expect("AI request");
        assert_eq!(request.mark, Player::O);
        assert_eq!(request.board, session.view().board);
        assert!(session.view().thinking);
    }

    #[test]
    fn test_click_ignored_during_computer_turn() {
        let mut session = Session::new(false);
        session.handle(UiEvent::SelectMode(Mode::VsComputer));
        session.handle(UiEvent::ClickCell(0));
        // O to move; clicks must not land.
        assert!(session.handle(UiEvent::ClickCell(1)).is_none());
        assert!(session.view().board.is_empty(1));
    }

    #[test]
    fn test_stale_move_discarded_after_reset() {
        let mut session = Session::new(false);
        session.handle(UiEvent::SelectMode(Mode::VsComputer));
        let request = session.handle(UiEvent::ClickCell(0)).expect("AI request");

        session.handle(UiEvent::Reset);
        assert!(session.apply_automated(&request, 4).is_none());
        let view = session.view();
        assert!(view.board.squares().iter().all(|s| *s == Square::Empty));
        assert!(!view.thinking);
    }

    #[test]
    fn test_fresh_move_applies() {
        let mut session = Session::new(false);
        session.handle(UiEvent::SelectMode(Mode::VsComputer));
        let request = session.handle(UiEvent::ClickCell(0)).expect("AI request");

        assert!(session.apply_automated(&request, 4).is_none());
        let view = session.view();
        assert_eq!(view.board.get(4), Some(Square::Occupied(Player::O)));
        assert_eq!(view.to_move, Player::X);
        assert!(!view.thinking);
        assert_eq!(view.message, "Your turn (X)");
    }

    #[test]
    fn test_assisted_messages() {
        let mut session = Session::new(true);
        session.handle(UiEvent::SelectMode(Mode::VsComputer));
        assert_eq!(session.view().message, "Your turn (X) [vs LLM]");
        session.handle(UiEvent::ClickCell(0));
        assert_eq!(session.view().message, "LLM is thinking...");
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut session = Session::new(false);
        session.handle(UiEvent::SelectMode(Mode::TwoPlayer));
        session.handle(UiEvent::ClickCell(0));
        session.handle(UiEvent::Reset);
        let view = session.view();
        assert_eq!(view.mode, Some(Mode::TwoPlayer));
        assert_eq!(view.phase, Phase::Playing);
        assert_eq!(view.to_move, Player::X);
        assert!(view.board.is_empty(0));
    }

    #[test]
    fn test_new_game_clears_mode() {
        let mut session = Session::new(false);
        session.handle(UiEvent::SelectMode(Mode::TwoPlayer));
        session.handle(UiEvent::ClickCell(0));
        session.handle(UiEvent::NewGame);
        let view = session.view();
        assert_eq!(view.mode, None);
        assert_eq!(view.phase, Phase::NotStarted);
        assert!(view.board.is_empty(0));
    }

    #[test]
    fn test_reset_without_mode_is_noop() {
        let mut session = Session::new(false);
        assert!(session.handle(UiEvent::Reset).is_none());
        assert_eq!(session.view().phase, Phase::NotStarted);
    }
}
