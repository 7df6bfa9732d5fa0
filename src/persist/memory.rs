//! In-memory slot shared between instances in one process.

use super::payload::StoredState;
use super::{CasOutcome, PersistenceChannel, PersistError, Snapshot};
use crate::game::GameState;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// A shared slot holding the serialized payload in memory.
///
/// Clones share the same slot, modeling several tabs against one storage
/// key. The stored value is the JSON text itself, so loads exercise the
/// same parse path as the file slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the raw payload text. Test hook for malformed data.
    pub fn put_raw(&self, text: impl Into<String>) {
        *self.slot.lock().unwrap() = Some(text.into());
    }

    fn seq_of(text: &Option<String>) -> u64 {
        text.as_deref()
            .and_then(|t| serde_json::from_str::<StoredState>(t).ok())
            .map(|stored| stored.seq)
            .unwrap_or(0)
    }
}

impl PersistenceChannel for MemorySlot {
    fn save(&self, state: &GameState) -> Result<u64, PersistError> {
        let mut guard = self.slot.lock().unwrap();
        let seq = Self::seq_of(&guard) + 1;
        *guard = Some(serde_json::to_string(&StoredState::encode(state, seq))?);
        Ok(seq)
    }

    fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        let guard = self.slot.lock().unwrap();
        let Some(text) = guard.as_deref() else {
            return Ok(None);
        };
        match serde_json::from_str::<StoredState>(text) {
            Ok(stored) => Ok(Some(stored.decode())),
            Err(e) => {
                warn!(error = %e, "malformed slot payload, treating as absent");
                Ok(None)
            }
        }
    }

    fn save_if(&self, state: &GameState, expected_seq: u64) -> Result<CasOutcome, PersistError> {
        let mut guard = self.slot.lock().unwrap();
        let slot_seq = Self::seq_of(&guard);
        if slot_seq != expected_seq {
            return Ok(CasOutcome::Stale { slot_seq });
        }
        let seq = expected_seq + 1;
        *guard = Some(serde_json::to_string(&StoredState::encode(state, seq))?);
        Ok(CasOutcome::Written(seq))
    }
}
