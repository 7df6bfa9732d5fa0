//! Tic-tac-toe core with cross-instance state synchronization.
//!
//! Two players share one game whose complete state lives in a single
//! persisted slot. Every running instance applies its own commands
//! immediately, saves after each mutation, and polls the slot to adopt
//! changes made by peers. Whichever instance saved last wins; an optional
//! compare-and-swap write mode rejects stale saves instead.
//!
//! The view layer and the storage backend are collaborators injected as
//! traits: a [`Renderer`] receives push notifications, a
//! [`PersistenceChannel`] holds the slot.
//!
//! # Example
//!
//! ```
//! use tictactoe_sync::{GameInstance, MemorySlot, TracingRenderer};
//!
//! let slot = MemorySlot::new();
//! let instance = GameInstance::new(slot.clone(), TracingRenderer);
//! instance.start();
//! instance.play(4).unwrap();
//!
//! // A second "tab" against the same slot picks the move up on its poll.
//! let peer = GameInstance::new(slot, TracingRenderer);
//! peer.start();
//! assert_eq!(peer.state(), instance.state());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod game;
mod instance;
mod persist;
mod render;

pub use config::{ConfigError, SyncConfig, WriteMode};
pub use game::{
    Board, Cell, Command, GameState, GameStatus, LINES, Mark, MoveError, Player, Position, Scores,
    WinningLine, rules,
};
pub use instance::GameInstance;
pub use persist::{CasOutcome, FileSlot, MemorySlot, PersistenceChannel, PersistError, Snapshot};
pub use render::{Renderer, TracingRenderer};
