//! Renderer collaborator interface.

use crate::game::{Board, GameStatus, Player, Scores};
use tracing::{debug, info, warn};

/// Push notifications from the core to a view.
///
/// The core never reads back from the view; it only tells it what changed.
/// Implementations should be cheap and must not call back into the
/// notifying instance.
pub trait Renderer: Send + Sync {
    /// The board contents changed.
    fn board_changed(&self, board: &Board);

    /// The round status changed. A `Won` status carries the winner and the
    /// completed line for highlighting.
    fn status_changed(&self, status: &GameStatus, current_player: Player);

    /// The score tallies changed.
    fn scores_changed(&self, scores: &Scores);

    /// The turn indicator should point at this player.
    fn turn_indicator_changed(&self, current_player: Player);

    /// A state write did not reach storage; the game continues in memory
    /// but will not survive a reload or reach peers.
    fn persistence_warning(&self, _message: &str) {}
}

/// Renderer that logs every notification through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRenderer;

impl Renderer for TracingRenderer {
    fn board_changed(&self, board: &Board) {
        debug!(occupied = board.occupied_count(), "board changed:\n{}", board.display());
    }

    fn status_changed(&self, status: &GameStatus, current_player: Player) {
        info!(?status, %current_player, "status changed");
    }

    fn scores_changed(&self, scores: &Scores) {
        info!(x = scores.x, o = scores.o, draw = scores.draw, "scores changed");
    }

    fn turn_indicator_changed(&self, current_player: Player) {
        debug!(%current_player, "turn indicator changed");
    }

    fn persistence_warning(&self, message: &str) {
        warn!(message, "persistence warning");
    }
}
