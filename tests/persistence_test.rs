//! Slot round-trip, degradation, and conflict behavior.

use tictactoe_sync::{
    CasOutcome, FileSlot, GameState, MemorySlot, PersistenceChannel, Position,
};

fn played(indices: &[usize]) -> GameState {
    let mut state = GameState::new();
    for &index in indices {
        state
            .play(Position::from_index(index).unwrap())
            .expect("valid test move");
    }
    state
}

#[test]
fn memory_slot_round_trip() {
    let slot = MemorySlot::new();
    let state = played(&[0, 4, 1]);

    let seq = slot.save(&state).unwrap();
    assert_eq!(seq, 1);

    let snapshot = slot.load().unwrap().expect("slot holds a snapshot");
    assert_eq!(snapshot.seq, 1);
    assert_eq!(snapshot.state, state);
}

#[test]
fn memory_slot_sequence_is_monotonic() {
    let slot = MemorySlot::new();
    assert_eq!(slot.save(&played(&[0])).unwrap(), 1);
    assert_eq!(slot.save(&played(&[0, 4])).unwrap(), 2);
    assert_eq!(slot.save(&played(&[0, 4, 1])).unwrap(), 3);
    assert_eq!(slot.load().unwrap().unwrap().seq, 3);
}

#[test]
fn empty_slot_loads_as_none() {
    assert!(MemorySlot::new().load().unwrap().is_none());
}

#[test]
fn malformed_payload_degrades_to_absent() {
    let slot = MemorySlot::new();
    slot.put_raw("{not json");
    assert!(slot.load().unwrap().is_none());

    slot.put_raw(r#"{"board": ["X"], "currentPlayer": "X", "gameActive": true, "scores": {"x":0,"o":0,"draw":0}}"#);
    assert!(slot.load().unwrap().is_none());
}

#[test]
fn clones_share_the_same_slot() {
    let slot = MemorySlot::new();
    let peer = slot.clone();
    slot.save(&played(&[4])).unwrap();

    let snapshot = peer.load().unwrap().unwrap();
    assert_eq!(snapshot.state, played(&[4]));
}

#[test]
fn compare_and_swap_rejects_a_stale_write() {
    let slot = MemorySlot::new();
    let base = played(&[0]);
    let seq = slot.save(&base).unwrap();

    // Peer A saves on top of seq 1.
    let a = played(&[0, 4]);
    assert_eq!(slot.save_if(&a, seq).unwrap(), CasOutcome::Written(2));

    // Peer B, still on seq 1, is told the slot moved.
    let b = played(&[0, 8]);
    assert_eq!(
        slot.save_if(&b, seq).unwrap(),
        CasOutcome::Stale { slot_seq: 2 }
    );
    // The slot still holds A's write.
    assert_eq!(slot.load().unwrap().unwrap().state, a);
}

#[test]
fn last_write_wins_loses_the_first_update() {
    // Both peers start from the same snapshot; whoever saves last
    // overwrites the other's move entirely.
    let slot = MemorySlot::new();
    slot.save(&played(&[0])).unwrap();

    let a = played(&[0, 4]);
    let b = played(&[0, 8]);
    slot.save(&a).unwrap();
    slot.save(&b).unwrap();

    let stored = slot.load().unwrap().unwrap().state;
    assert_eq!(stored, b);
    assert_ne!(stored, a);
}

#[test]
fn file_slot_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let slot = FileSlot::new(dir.path().join("game.json"));
    let state = played(&[0, 4, 1, 8, 2]);

    let seq = slot.save(&state)?;
    assert_eq!(seq, 1);

    let snapshot = slot.load()?.expect("slot holds a snapshot");
    assert_eq!(snapshot.state, state);
    assert!(!snapshot.state.is_active());
    Ok(())
}

#[test]
fn file_slot_missing_file_is_absent() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let slot = FileSlot::new(dir.path().join("never-written.json"));
    assert!(slot.load()?.is_none());
    Ok(())
}

#[test]
fn file_slot_garbage_degrades_to_absent() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("game.json");
    std::fs::write(&path, "left over from some other program")?;

    let slot = FileSlot::new(&path);
    assert!(slot.load()?.is_none());

    // A save recovers the slot.
    slot.save(&played(&[4]))?;
    assert!(slot.load()?.is_some());
    Ok(())
}

#[test]
fn file_slot_compare_and_swap() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let slot = FileSlot::new(dir.path().join("game.json"));

    // Fresh slot is at seq 0.
    assert_eq!(
        slot.save_if(&played(&[0]), 0)?,
        CasOutcome::Written(1)
    );
    assert_eq!(
        slot.save_if(&played(&[0, 4]), 0)?,
        CasOutcome::Stale { slot_seq: 1 }
    );
    Ok(())
}

#[test]
fn legacy_flat_payload_is_readable() {
    // The legacy flat shape: no seq field.
    let slot = MemorySlot::new();
    slot.put_raw(
        r#"{"board":["X","","","","O","","","",""],"currentPlayer":"X","gameActive":true,"scores":{"x":2,"o":1,"draw":3}}"#,
    );

    let snapshot = slot.load().unwrap().expect("legacy payload readable");
    assert_eq!(snapshot.seq, 0);
    assert_eq!(snapshot.state.scores().draw, 3);
    assert!(snapshot.state.is_active());
}
