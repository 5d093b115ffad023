//! Heuristic move selection for the computer opponent.
//!
//! The policy is evaluated in strict priority order: win now, block the
//! opponent's win, take the center or a corner, otherwise any open square.
//! The win and block scans walk the open squares in ascending index order
//! and return the first hit; only the last two steps draw at random.

use super::{available_moves, check_winner, Board, Player, Square};
use rand::Rng;
use tracing::instrument;

/// Center first, then corners in reading order.
const PREFERRED: [usize; 5] = [4, 0, 2, 6, 8];

/// Picks the computer's next move.
///
/// `rng` is injected so callers can seed the random tie-breaking.
/// Returns `None` only when the board has no open square.
#[instrument(skip(rng))]
pub fn best_move<R: Rng>(
    board: &Board,
    ai: Player,
    human: Player,
    rng: &mut R,
) -> Option<usize> {
    let open = available_moves(board);
    if open.is_empty() {
        return None;
    }

    // Take an immediate win.
    for &pos in &open {
        if wins_at(board, pos, ai) {
            return Some(pos);
        }
    }

    // Block the opponent's immediate win.
    for &pos in &open {
        if wins_at(board, pos, human) {
            return Some(pos);
        }
    }

    // Prefer center, then corners.
    let favored: Vec<usize> = PREFERRED
        .iter()
        .copied()
        .filter(|&pos| board.is_empty(pos))
        .collect();
    if !favored.is_empty() {
        return Some(favored[rng.random_range(0..favored.len())]);
    }

    Some(open[rng.random_range(0..open.len())])
}

/// Simulates placing `player` at `pos` and checks for a win.
fn wins_at(board: &Board, pos: usize, player: Player) -> bool {
    let mut trial = board.clone();
    if trial.set(pos, Square::Occupied(player)).is_err() {
        return false;
    }
    check_winner(&trial) == Some(player)
}
