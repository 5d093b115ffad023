//! Application state and keyboard mapping for the TUI.

use crate::session::{Mode, SessionView, UiEvent};
use crossterm::event::KeyCode;
use tracing::debug;

/// What a key press should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the TUI.
    Quit,
    /// Forward a game event to the orchestrator.
    Forward(UiEvent),
}

/// Maps a key press to an action.
///
/// Digits 1-9 address cells in reading order. Keys that make no sense for
/// the current state are forwarded anyway; the session ignores them.
pub fn action_for_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') | KeyCode::Char('C') => {
            Some(Action::Forward(UiEvent::SelectMode(Mode::VsComputer)))
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            Some(Action::Forward(UiEvent::SelectMode(Mode::TwoPlayer)))
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Forward(UiEvent::Reset)),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::Forward(UiEvent::NewGame)),
        KeyCode::Char(digit @ '1'..='9') => {
            let pos = digit as usize - '1' as usize;
            Some(Action::Forward(UiEvent::ClickCell(pos)))
        }
        _ => None,
    }
}

/// Main application state: the latest session snapshot.
pub struct App {
    view: Option<SessionView>,
}

impl App {
    /// Creates a new application awaiting its first snapshot.
    pub fn new() -> Self {
        Self { view: None }
    }

    /// Gets the latest snapshot, if one arrived.
    pub fn view(&self) -> Option<&SessionView> {
        self.view.as_ref()
    }

    /// Stores a fresh snapshot from the orchestrator.
    pub fn update(&mut self, view: SessionView) {
        debug!(message = %view.message, "View updated");
        self.view = Some(view);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_keys_map_to_cells() {
        assert_eq!(
            action_for_key(KeyCode::Char('1')),
            Some(Action::Forward(UiEvent::ClickCell(0)))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('9')),
            Some(Action::Forward(UiEvent::ClickCell(8)))
        );
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(action_for_key(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(
            action_for_key(KeyCode::Char('r')),
            Some(Action::Forward(UiEvent::Reset))
        );
        assert_eq!(
            action_for_key(KeyCode::Char('c')),
            Some(Action::Forward(UiEvent::SelectMode(Mode::VsComputer)))
        );
        assert_eq!(action_for_key(KeyCode::Char('x')), None);
    }
}
