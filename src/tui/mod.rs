//! Terminal UI for the tic-tac-toe session.

mod app;
mod ui;

use crate::orchestrator::{UiSender, ViewReceiver};
use anyhow::Result;
use app::{action_for_key, Action, App};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Runs the TUI against a running orchestrator.
///
/// Returns when the user quits. Dropping the UI sender on exit stops the
/// orchestrator loop.
pub async fn run_tui(ui_tx: UiSender, mut view_rx: ViewReceiver) -> Result<()> {
    info!("Starting TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, ui_tx, &mut view_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }

    res
}

/// Forwards terminal key presses into a channel.
///
/// Runs on a plain thread so the blocking `event::read` never stalls the
/// async loop. The thread ends with the process.
fn spawn_input_listener() -> mpsc::UnboundedReceiver<event::KeyEvent> {
    let (key_tx, key_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if key_tx.send(key).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!(error = ?e, "Failed to read terminal event");
                    break;
                }
            }
        }
    });
    key_rx
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ui_tx: UiSender,
    view_rx: &mut ViewReceiver,
) -> Result<()> {
    let mut app = App::new();
    let mut key_rx = spawn_input_listener();

    terminal.draw(|f| ui::draw(f, &app))?;

    loop {
        tokio::select! {
            maybe_view = view_rx.recv() => {
                let Some(view) = maybe_view else {
                    info!("Orchestrator hung up; leaving TUI");
                    return Ok(());
                };
                app.update(view);
                terminal.draw(|f| ui::draw(f, &app))?;
            }
            maybe_key = key_rx.recv() => {
                let Some(key) = maybe_key else {
                    return Ok(());
                };
                match action_for_key(key.code) {
                    Some(Action::Quit) => {
                        info!("Quit requested");
                        return Ok(());
                    }
                    Some(Action::Forward(event)) => {
                        debug!(?event, "Forwarding UI event");
                        if ui_tx.send(event).is_err() {
                            return Ok(());
                        }
                    }
                    None => {}
                }
            }
        }
    }
}
