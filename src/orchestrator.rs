//! Orchestration between the UI, the session and move acquisition.
//!
//! The orchestrator is the single logical thread of control: UI events come
//! in over a channel, session snapshots go back out, and automated moves are
//! resolved on spawned tasks so the UI stays responsive while the suggestion
//! service (or the cosmetic thinking delay) is pending. Results come back
//! tagged with the request they answer; the session discards them if the
//! board moved on in the meantime.

use crate::games::tictactoe::best_move;
use crate::session::{AiRequest, Session, SessionView, UiEvent};
use crate::suggest::MoveSuggester;
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Handle for feeding UI events to a running orchestrator.
pub type UiSender = mpsc::UnboundedSender<UiEvent>;

/// Stream of session snapshots for the UI.
pub type ViewReceiver = mpsc::UnboundedReceiver<SessionView>;

/// A resolved automated move, still tagged with its request.
struct AiOutcome {
    request: AiRequest,
    position: usize,
}

/// Drives a game session.
pub struct Orchestrator {
    session: Session,
    suggester: Option<Arc<dyn MoveSuggester>>,
    thinking_delay: Duration,
    rng: StdRng,
    ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    view_tx: mpsc::UnboundedSender<SessionView>,
    ai_tx: mpsc::UnboundedSender<AiOutcome>,
    ai_rx: mpsc::UnboundedReceiver<AiOutcome>,
}

impl Orchestrator {
    /// Creates an orchestrator and its UI-facing channel endpoints.
    ///
    /// `suggester` enables the assisted path when present; `thinking_delay`
    /// is the cosmetic pause before an automated move lands (zero is fine);
    /// `seed` pins the heuristic's tie-breaking for reproducible play.
    pub fn new(
        suggester: Option<Arc<dyn MoveSuggester>>,
        thinking_delay: Duration,
        seed: Option<u64>,
    ) -> (Self, UiSender, ViewReceiver) {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = mpsc::unbounded_channel();
        let (ai_tx, ai_rx) = mpsc::unbounded_channel();

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let orchestrator = Self {
            session: Session::new(suggester.is_some()),
            suggester,
            thinking_delay,
            rng,
            ui_rx,
            view_tx,
            ai_tx,
            ai_rx,
        };

        (orchestrator, ui_tx, view_rx)
    }

    /// Runs the event loop until the UI hangs up.
    pub async fn run(mut self) -> Result<()> {
        info!("Starting game orchestration");

        // Initial snapshot so the UI can draw the menu.
        if !self.publish() {
            return Ok(());
        }

        loop {
            tokio::select! {
                maybe_event = self.ui_rx.recv() => {
                    let Some(event) = maybe_event else {
                        info!("UI channel closed; stopping orchestration");
                        break;
                    };
                    debug!(?event, "Handling UI event");
                    let request = self.session.handle(event);
                    if !self.publish() {
                        break;
                    }
                    if let Some(request) = request {
                        self.dispatch(request);
                    }
                }
                Some(outcome) = self.ai_rx.recv() => {
                    let request = self
                        .session
                        .apply_automated(&outcome.request, outcome.position);
                    if !self.publish() {
                        break;
                    }
                    if let Some(request) = request {
                        self.dispatch(request);
                    }
                }
            }
        }

        Ok(())
    }

    /// Sends a fresh snapshot to the UI. False when the UI is gone.
    fn publish(&self) -> bool {
        self.view_tx.send(self.session.view()).is_ok()
    }

    /// Spawns the acquisition task for a pending automated move.
    fn dispatch(&mut self, request: AiRequest) {
        let suggester = self.suggester.clone();
        let delay = self.thinking_delay;
        let seed: u64 = self.rng.random();
        let ai_tx = self.ai_tx.clone();

        tokio::spawn(async move {
            let position = acquire_move(suggester, &request, seed).await;
            tokio::time::sleep(delay).await;
            match position {
                Some(position) => {
                    let _ = ai_tx.send(AiOutcome { request, position });
                }
                None => warn!("No move available for a pending request"),
            }
        });
    }
}

/// Resolves the automated player's move.
///
/// The suggestion service, when configured, gets exactly one attempt; any
/// failure (transport error, unparseable reply, unusable cell) falls back to
/// the local heuristic on the same board.
async fn acquire_move(
    suggester: Option<Arc<dyn MoveSuggester>>,
    request: &AiRequest,
    seed: u64,
) -> Option<usize> {
    if let Some(suggester) = suggester {
        match suggester.suggest(&request.board, request.mark).await {
            Ok(pos) if request.board.is_empty(pos) => {
                debug!(pos, "Using suggested move");
                return Some(pos);
            }
            Ok(pos) => {
                warn!(pos, "Suggested cell unusable; falling back to heuristic");
            }
            Err(e) => {
                debug!(error = %e, "Suggestion failed; falling back to heuristic");
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    best_move(&request.board, request.mark, request.mark.opponent(), &mut rng)
}
