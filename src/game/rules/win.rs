//! Win detection over the 8 fixed lines.

use super::super::board::{Board, Cell, Player};
use super::super::position::Position;
use tracing::instrument;

/// A completed line: three positions uniformly marked by one player.
pub type WinningLine = [Position; 3];

/// The 8 fixed index triples: 3 rows, 3 columns, 2 diagonals.
///
/// Scan order matters only for tie-breaking: the first matching triple in
/// this enumeration is the one reported.
pub const LINES: [WinningLine; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Scans the fixed lines and returns the first completed one with its owner.
///
/// Returns `None` when no row, column, or diagonal is uniformly one
/// occupied mark.
#[instrument]
pub fn winning_line(board: &Board) -> Option<(Player, WinningLine)> {
    for line in LINES {
        let [a, b, c] = line;
        let cell = board.get(a);
        if cell != Cell::Empty && cell == board.get(b) && cell == board.get(c) {
            if let Cell::Occupied(player) = cell {
                return Some((player, line));
            }
        }
    }
    None
}

/// The winner on the board, if any.
#[instrument]
pub fn check_winner(board: &Board) -> Option<Player> {
    winning_line(board).map(|(player, _)| player)
}
