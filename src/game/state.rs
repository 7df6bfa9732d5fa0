//! Game state and its transitions.

use super::board::{Board, Player};
use super::command::MoveError;
use super::position::Position;
use super::rules::{self, WinningLine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Win/draw tallies across rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    /// Rounds won by X.
    pub x: u32,
    /// Rounds won by O.
    pub o: u32,
    /// Drawn rounds.
    pub draw: u32,
}

impl Scores {
    /// Credits a win to the given player.
    pub fn record_win(&mut self, winner: Player) {
        match winner {
            Player::X => self.x += 1,
            Player::O => self.o += 1,
        }
    }

    /// Credits a draw.
    pub fn record_draw(&mut self) {
        self.draw += 1;
    }

    /// Exchanges the X and O tallies; the draw tally is untouched.
    pub fn swap_xo(&mut self) {
        std::mem::swap(&mut self.x, &mut self.o);
    }
}

/// Derived view of where the round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Awaiting a move from the current player.
    Active,
    /// The round ended with a completed line.
    Won {
        /// The player owning the completed line.
        winner: Player,
        /// The completed line, for highlighting.
        line: WinningLine,
    },
    /// The board filled with no completed line.
    Draw,
}

/// Complete state of one shared game.
///
/// Mutated only through [`play`](GameState::play),
/// [`reset`](GameState::reset), and [`swap_sides`](GameState::swap_sides),
/// or replaced wholesale when a peer's snapshot is adopted. It is never
/// destroyed, only overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    active: bool,
    scores: Scores,
}

impl GameState {
    /// Fresh state: empty board, X to move, zero scores.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            active: true,
            scores: Scores::default(),
        }
    }

    /// Rebuilds a state from its parts, e.g. after decoding a snapshot.
    ///
    /// The caller is responsible for the terminal-state invariant: when
    /// `active` is false the board should be full or contain a completed
    /// line, or [`status`](GameState::status) will report a draw.
    pub fn from_parts(board: Board, current_player: Player, active: bool, scores: Scores) -> Self {
        Self {
            board,
            current_player,
            active,
            scores,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player whose turn it is. After a winning move this still names
    /// the winner; the turn does not pass out of a finished round.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Whether the round is still accepting moves.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The score tallies.
    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Derives the round status from the board.
    ///
    /// Deriving rather than storing keeps an adopted peer snapshot
    /// reporting the same outcome the instance that saved it saw.
    pub fn status(&self) -> GameStatus {
        if self.active {
            return GameStatus::Active;
        }
        match rules::winning_line(&self.board) {
            Some((winner, line)) => GameStatus::Won { winner, line },
            None => GameStatus::Draw,
        }
    }

    /// Applies the current player's move at `pos`.
    ///
    /// On a completed line the round ends, the winner's tally increments,
    /// and the turn stays with the winner. On a full board the round ends
    /// as a draw. Otherwise the turn passes to the opponent.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] when the round already ended, or
    /// [`MoveError::CellOccupied`] for a taken cell. The state is unchanged
    /// on error.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn play(&mut self, pos: Position) -> Result<GameStatus, MoveError> {
        if !self.active {
            return Err(MoveError::GameOver);
        }
        self.board.place(pos, self.current_player)?;

        if let Some((winner, line)) = rules::winning_line(&self.board) {
            self.active = false;
            self.scores.record_win(winner);
            info!(%winner, "round won");
            return Ok(GameStatus::Won { winner, line });
        }

        if rules::is_full(&self.board) {
            self.active = false;
            self.scores.record_draw();
            info!("round drawn");
            return Ok(GameStatus::Draw);
        }

        self.current_player = self.current_player.opponent();
        debug!(next = %self.current_player, "turn passed");
        Ok(GameStatus::Active)
    }

    /// Starts a new round: empty board, X to move. Scores are kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = Player::X;
        self.active = true;
        info!("round reset");
    }

    /// Swaps which player owns which mark.
    ///
    /// Every cell remaps X to O and O to X. While the round is active the
    /// turn flips too, and the X/O tallies always exchange regardless. In
    /// a terminal state this relabels the finished board and swaps tallies
    /// that were already attributed under the old labeling; both effects
    /// are kept independent on purpose, matching the observed behavior
    /// this replicates.
    #[instrument(skip(self))]
    pub fn swap_sides(&mut self) {
        self.board.swap_marks();
        if self.active {
            self.current_player = self.current_player.opponent();
        }
        self.scores.swap_xo();
        info!(now_to_move = %self.current_player, "sides swapped");
    }

    /// Whether this state differs from `other` in what the sync loop
    /// watches: board contents, current player, or the active flag.
    ///
    /// Scores are deliberately excluded from the comparison, though a
    /// snapshot is adopted wholesale (scores included) once any watched
    /// field differs.
    pub fn differs_from(&self, other: &GameState) -> bool {
        self.board != other.board
            || self.current_player != other.current_player
            || self.active != other.active
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state() {
        let state = GameState::new();
        assert!(state.is_active());
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.scores(), Scores::default());
        assert_eq!(state.status(), GameStatus::Active);
    }

    #[test]
    fn scores_excluded_from_difference_check() {
        let a = GameState::new();
        let mut b = GameState::new();
        b.scores.x = 5;
        assert!(!a.differs_from(&b));
    }

    #[test]
    fn board_change_is_a_difference() {
        let a = GameState::new();
        let mut b = GameState::new();
        b.play(Position::Center).unwrap();
        assert!(a.differs_from(&b));
    }
}
