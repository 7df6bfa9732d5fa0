//! Draw detection.

use super::super::board::{Board, Cell};
use super::win::check_winner;
use tracing::instrument;

/// Whether every cell is occupied.
#[instrument]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Cell::Empty)
}

/// A full board with no winner is a draw.
#[instrument]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}
