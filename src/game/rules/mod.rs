//! Game rules for the 3x3 grid.
//!
//! Pure functions over a [`Board`](super::board::Board); evaluation order and
//! outcomes are independent of any game state bookkeeping.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, WinningLine, check_winner, winning_line};
