//! File-backed slot.

use super::payload::StoredState;
use super::{CasOutcome, PersistenceChannel, PersistError, Snapshot};
use crate::game::GameState;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A slot stored as one JSON file.
///
/// Writes go through a sibling temp file and a rename, so readers never see
/// a half-written payload. The conditional write is read-check-write with
/// no file locking: two processes can still interleave between the check
/// and the rename. Accepted looseness; the in-memory slot is the one with
/// an atomic compare-and-swap.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Creates a slot at the given path. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The slot's path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// The sequence number currently in the slot; 0 when absent or unreadable.
    fn current_seq(&self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str::<StoredState>(&text)
                .map(|stored| stored.seq)
                .unwrap_or(0),
            Err(_) => 0,
        }
    }

    fn write(&self, state: &GameState, seq: u64) -> Result<u64, PersistError> {
        let json = serde_json::to_string(&StoredState::encode(state, seq))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), seq, "slot written");
        Ok(seq)
    }
}

impl PersistenceChannel for FileSlot {
    fn save(&self, state: &GameState) -> Result<u64, PersistError> {
        self.write(state, self.current_seq() + 1)
    }

    fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<StoredState>(&text) {
            Ok(stored) => Ok(Some(stored.decode())),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed slot payload, treating as absent");
                Ok(None)
            }
        }
    }

    fn save_if(&self, state: &GameState, expected_seq: u64) -> Result<CasOutcome, PersistError> {
        let slot_seq = self.current_seq();
        if slot_seq != expected_seq {
            return Ok(CasOutcome::Stale { slot_seq });
        }
        self.write(state, expected_seq + 1).map(CasOutcome::Written)
    }
}
