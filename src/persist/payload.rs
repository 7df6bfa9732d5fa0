//! Wire format of the slot payload.
//!
//! The JSON shape is fixed by the behavior being replicated:
//!
//! ```json
//! { "seq": 3, "board": ["X", "", "O", "", "", "", "", "", ""],
//!   "currentPlayer": "X", "gameActive": true,
//!   "scores": { "x": 1, "o": 0, "draw": 0 } }
//! ```
//!
//! `seq` backs the optional compare-and-swap mode and defaults to 0 on
//! read, so payloads written without it (the legacy flat shape) stay
//! readable. Unknown fields are ignored.

use super::Snapshot;
use crate::game::{Board, Cell, GameState, Player, Scores};
use serde::{Deserialize, Serialize};

/// A cell as stored: empty string, `"X"`, or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum CellField {
    /// Empty cell, serialized as `""`.
    #[serde(rename = "")]
    Empty,
    /// Cell marked by X.
    X,
    /// Cell marked by O.
    O,
}

impl From<Cell> for CellField {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => CellField::Empty,
            Cell::Occupied(Player::X) => CellField::X,
            Cell::Occupied(Player::O) => CellField::O,
        }
    }
}

impl From<CellField> for Cell {
    fn from(field: CellField) -> Self {
        match field {
            CellField::Empty => Cell::Empty,
            CellField::X => Cell::Occupied(Player::X),
            CellField::O => Cell::Occupied(Player::O),
        }
    }
}

/// The serialized slot contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredState {
    #[serde(default)]
    pub seq: u64,
    pub board: [CellField; 9],
    #[serde(rename = "currentPlayer")]
    pub current_player: Player,
    #[serde(rename = "gameActive")]
    pub game_active: bool,
    pub scores: Scores,
}

impl StoredState {
    /// Captures a state for writing at the given sequence number.
    pub(crate) fn encode(state: &GameState, seq: u64) -> Self {
        let cells = state.board().cells();
        Self {
            seq,
            board: std::array::from_fn(|i| CellField::from(cells[i])),
            current_player: state.current_player(),
            game_active: state.is_active(),
            scores: state.scores(),
        }
    }

    /// Rebuilds the in-memory state.
    pub(crate) fn decode(self) -> Snapshot {
        let board = Board::from_cells(std::array::from_fn(|i| Cell::from(self.board[i])));
        Snapshot {
            seq: self.seq,
            state: GameState::from_parts(board, self.current_player, self.game_active, self.scores),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    #[test]
    fn wire_shape_matches_the_slot_contract() {
        let mut state = GameState::new();
        state.play(Position::TopLeft).unwrap();
        let json = serde_json::to_value(StoredState::encode(&state, 7)).unwrap();

        assert_eq!(json["seq"], 7);
        assert_eq!(json["board"][0], "X");
        assert_eq!(json["board"][1], "");
        assert_eq!(json["currentPlayer"], "O");
        assert_eq!(json["gameActive"], true);
        assert_eq!(json["scores"]["x"], 0);
        assert_eq!(json["scores"]["o"], 0);
        assert_eq!(json["scores"]["draw"], 0);
    }

    #[test]
    fn legacy_payload_without_seq_reads_as_seq_zero() {
        let raw = r#"{
            "board": ["X", "", "", "", "O", "", "", "", ""],
            "currentPlayer": "X",
            "gameActive": true,
            "scores": { "x": 2, "o": 1, "draw": 0 }
        }"#;
        let snapshot = serde_json::from_str::<StoredState>(raw).unwrap().decode();
        assert_eq!(snapshot.seq, 0);
        assert_eq!(snapshot.state.current_player(), Player::X);
        assert_eq!(snapshot.state.scores().x, 2);
        assert_eq!(
            snapshot.state.board().get(Position::Center),
            Cell::Occupied(Player::O)
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw = r#"{
            "board": ["", "", "", "", "", "", "", "", ""],
            "currentPlayer": "O",
            "gameActive": false,
            "scores": { "x": 0, "o": 0, "draw": 1 },
            "futureField": { "nested": true }
        }"#;
        assert!(serde_json::from_str::<StoredState>(raw).is_ok());
    }

    #[test]
    fn short_board_rejected() {
        let raw = r#"{
            "board": ["X", "O"],
            "currentPlayer": "X",
            "gameActive": true,
            "scores": { "x": 0, "o": 0, "draw": 0 }
        }"#;
        assert!(serde_json::from_str::<StoredState>(raw).is_err());
    }

    #[test]
    fn bad_mark_rejected() {
        let raw = r#"{
            "board": ["Z", "", "", "", "", "", "", "", ""],
            "currentPlayer": "X",
            "gameActive": true,
            "scores": { "x": 0, "o": 0, "draw": 0 }
        }"#;
        assert!(serde_json::from_str::<StoredState>(raw).is_err());
    }

    #[test]
    fn encode_decode_round_trip() {
        let mut state = GameState::new();
        state.play(Position::Center).unwrap();
        state.play(Position::TopLeft).unwrap();
        let snapshot = StoredState::encode(&state, 3).decode();
        assert_eq!(snapshot.seq, 3);
        assert_eq!(snapshot.state, state);
    }
}
