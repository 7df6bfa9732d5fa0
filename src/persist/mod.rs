//! Persistence channel: the single shared slot behind the game.
//!
//! The slot doubles as durability and as the synchronization medium
//! between instances. Every write replaces the whole snapshot; a monotonic
//! sequence number rides along so callers can opt into compare-and-swap
//! writes instead of the baseline last-write-wins.

mod file;
mod memory;
mod payload;

pub use file::FileSlot;
pub use memory::MemorySlot;

use crate::game::GameState;
use derive_more::{Display, Error, From};

/// A loaded snapshot together with its slot sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Monotonic write counter of the slot at load time.
    pub seq: u64,
    /// The decoded state.
    pub state: GameState,
}

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The write landed; the slot is now at this sequence number.
    Written(u64),
    /// The slot moved since the caller last read it; nothing was written.
    Stale {
        /// The sequence number found in the slot.
        slot_seq: u64,
    },
}

/// Failure talking to the storage slot.
///
/// Write failures are non-fatal to a running instance: the in-memory state
/// stays correct but will not survive a reload or reach peers. Read
/// failures degrade to "no saved state".
#[derive(Debug, Display, Error, From)]
pub enum PersistError {
    /// Underlying storage I/O failed.
    #[display("slot i/o failed: {}", source)]
    Io {
        /// The I/O error.
        source: std::io::Error,
    },
    /// The state could not be encoded for storage.
    #[display("snapshot encoding failed: {}", source)]
    Encoding {
        /// The serialization error.
        source: serde_json::Error,
    },
}

/// The single named storage slot shared by all instances of one game.
///
/// Last write wins: there is no merging, and in the baseline mode no
/// concurrency control at all. [`save_if`](PersistenceChannel::save_if)
/// offers the optional versioned alternative.
pub trait PersistenceChannel: Send + Sync {
    /// Unconditionally overwrites the slot. Returns the new sequence number.
    fn save(&self, state: &GameState) -> Result<u64, PersistError>;

    /// Reads the latest snapshot.
    ///
    /// `Ok(None)` when no state was ever saved. A payload that fails to
    /// parse is treated the same way, never as a hard error.
    fn load(&self) -> Result<Option<Snapshot>, PersistError>;

    /// Writes only if the slot is still at `expected_seq`.
    fn save_if(&self, state: &GameState, expected_seq: u64) -> Result<CasOutcome, PersistError>;
}
