//! User-triggered commands and move rejection errors.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// A command from the view layer.
///
/// Commands are first-class values so a caller can queue, log, or replay
/// them independently of execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Command {
    /// Place the current player's mark at a board index (0-8).
    #[display("play {}", index)]
    Play {
        /// Row-major board index.
        index: usize,
    },
    /// Start a new round, keeping the score tallies.
    #[display("reset")]
    Reset,
    /// Swap which player owns which mark.
    #[display("swap sides")]
    SwapSides,
}

/// Why a move was rejected.
///
/// Rejections are not fatal: the caller logs them and leaves the state
/// untouched, and nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The index does not name a cell on the 3x3 grid.
    #[display("index {} is outside the board", _0)]
    OutOfRange(usize),
    /// The target cell already holds a mark.
    #[display("cell {} is already occupied", _0)]
    CellOccupied(Position),
    /// The round has finished; only reset or swap are accepted.
    #[display("the round is over")]
    GameOver,
}

impl std::error::Error for MoveError {}
