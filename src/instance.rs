//! A running game instance: state machine + slot + renderer.

use crate::config::{SyncConfig, WriteMode};
use crate::game::{Board, Command, GameState, GameStatus, MoveError, Player, Position, Scores};
use crate::persist::{CasOutcome, PersistenceChannel};
use crate::render::Renderer;
use std::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

/// Local state plus the slot sequence number it corresponds to.
#[derive(Debug)]
struct Inner {
    state: GameState,
    seq: u64,
}

/// Everything a renderer needs after a mutation, captured under the lock so
/// notifications can fire after it is released.
struct ViewUpdate {
    board: Board,
    status: GameStatus,
    scores: Scores,
    current_player: Player,
    warning: Option<String>,
}

/// One running instance of the shared game.
///
/// Several instances (tabs, processes, tests) may run against the same
/// slot; each applies local commands immediately, persists after every
/// mutation, and adopts peer changes from its polling loop. Wrap in an
/// [`Arc`](std::sync::Arc) to drive [`run`](GameInstance::run) from a
/// spawned task while handing out commands from elsewhere.
pub struct GameInstance<C: PersistenceChannel, R: Renderer> {
    inner: Mutex<Inner>,
    channel: C,
    renderer: R,
    config: SyncConfig,
}

impl<C: PersistenceChannel, R: Renderer> GameInstance<C, R> {
    /// Creates an instance with the default configuration.
    pub fn new(channel: C, renderer: R) -> Self {
        Self::with_config(channel, renderer, SyncConfig::default())
    }

    /// Creates an instance with an explicit configuration.
    pub fn with_config(channel: C, renderer: R, config: SyncConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: GameState::new(),
                seq: 0,
            }),
            channel,
            renderer,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// A copy of the current state.
    pub fn state(&self) -> GameState {
        self.inner.lock().unwrap().state.clone()
    }

    /// The current round status.
    pub fn status(&self) -> GameStatus {
        self.inner.lock().unwrap().state.status()
    }

    /// The slot sequence number this instance last observed.
    pub fn last_seq(&self) -> u64 {
        self.inner.lock().unwrap().seq
    }

    /// Brings the instance up: adopts a saved state when the slot has one,
    /// otherwise persists the fresh state. Fires every renderer
    /// notification either way.
    #[instrument(skip(self))]
    pub fn start(&self) {
        let mut inner = self.inner.lock().unwrap();
        let mut warning = None;
        match self.channel.load() {
            Ok(Some(snapshot)) => {
                info!(seq = snapshot.seq, "restoring saved state");
                inner.state = snapshot.state;
                inner.seq = snapshot.seq;
            }
            Ok(None) => {
                info!("no saved state, starting fresh");
                warning = self.persist_locked(&mut inner);
            }
            Err(e) => {
                warn!(error = %e, "slot unreadable, starting fresh");
                warning = self.persist_locked(&mut inner);
            }
        }
        let update = Self::capture(&inner, warning);
        drop(inner);
        self.notify_all(&update);
    }

    /// Dispatches a view command. Rejected moves are logged and dropped,
    /// matching the view contract where an invalid click does nothing.
    pub fn apply(&self, command: Command) {
        match command {
            Command::Play { index } => {
                if let Err(e) = self.play(index) {
                    debug!(index, error = %e, "move rejected");
                }
            }
            Command::Reset => self.reset(),
            Command::SwapSides => self.swap_sides(),
        }
    }

    /// Plays the current player's mark at a board index.
    ///
    /// # Errors
    ///
    /// Rejects out-of-range indices, occupied cells, and finished rounds.
    /// Nothing is mutated or persisted on rejection.
    #[instrument(skip(self))]
    pub fn play(&self, index: usize) -> Result<GameStatus, MoveError> {
        let pos = Position::from_index(index).ok_or(MoveError::OutOfRange(index))?;
        let mut inner = self.inner.lock().unwrap();
        let status = inner.state.play(pos)?;
        let warning = self.persist_locked(&mut inner);
        let update = Self::capture(&inner, warning);
        drop(inner);

        self.emit_warning(&update);
        self.renderer.board_changed(&update.board);
        self.renderer
            .status_changed(&update.status, update.current_player);
        self.renderer.turn_indicator_changed(update.current_player);
        if update.status != GameStatus::Active {
            // A finished round just changed a tally.
            self.renderer.scores_changed(&update.scores);
        }
        Ok(status)
    }

    /// Starts a new round; scores carry over.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.state.reset();
        let warning = self.persist_locked(&mut inner);
        let update = Self::capture(&inner, warning);
        drop(inner);

        self.emit_warning(&update);
        self.renderer.board_changed(&update.board);
        self.renderer
            .status_changed(&update.status, update.current_player);
        self.renderer.turn_indicator_changed(update.current_player);
    }

    /// Swaps which player owns which mark, board and tallies alike.
    #[instrument(skip(self))]
    pub fn swap_sides(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.state.swap_sides();
        let warning = self.persist_locked(&mut inner);
        let update = Self::capture(&inner, warning);
        drop(inner);

        self.emit_warning(&update);
        self.notify_view(&update);
    }

    /// One poll of the shared slot.
    ///
    /// Adopts the stored snapshot wholesale when it differs from the local
    /// state on board, current player, or active flag, and notifies the
    /// renderer. Equal states only refresh the observed sequence number.
    /// Read failures are logged and skipped; the next tick retries.
    #[instrument(skip(self))]
    pub fn sync_once(&self) {
        let snapshot = match self.channel.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "sync poll failed");
                return;
            }
        };

        let mut inner = self.inner.lock().unwrap();
        if !snapshot.state.differs_from(&inner.state) {
            inner.seq = snapshot.seq;
            return;
        }

        info!(seq = snapshot.seq, "adopting peer state");
        inner.state = snapshot.state;
        inner.seq = snapshot.seq;
        let update = Self::capture(&inner, None);
        drop(inner);

        self.notify_view(&update);
    }

    /// Runs the polling loop for the lifetime of the instance.
    ///
    /// The suspension point is the timer wait; commands applied between
    /// ticks take effect immediately and are saved before the next poll.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(period_ms = *self.config.poll_interval_ms(), "sync loop running");
        loop {
            ticker.tick().await;
            self.sync_once();
        }
    }

    /// Persists under the lock; returns a warning message to surface once
    /// the lock is released.
    fn persist_locked(&self, inner: &mut Inner) -> Option<String> {
        let result = match self.config.write_mode() {
            WriteMode::LastWriteWins => self.channel.save(&inner.state).map(CasOutcome::Written),
            WriteMode::CompareAndSwap => self.channel.save_if(&inner.state, inner.seq),
        };
        match result {
            Ok(CasOutcome::Written(seq)) => {
                inner.seq = seq;
                debug!(seq, "state persisted");
                None
            }
            Ok(CasOutcome::Stale { slot_seq }) => {
                warn!(
                    local_seq = inner.seq,
                    slot_seq, "write rejected, slot moved since last poll"
                );
                Some(format!(
                    "write rejected: slot is at seq {} but this instance last saw {}",
                    slot_seq, inner.seq
                ))
            }
            Err(e) => {
                warn!(error = %e, "state not persisted");
                Some(format!("state not persisted: {}", e))
            }
        }
    }

    fn capture(inner: &Inner, warning: Option<String>) -> ViewUpdate {
        ViewUpdate {
            board: inner.state.board().clone(),
            status: inner.state.status(),
            scores: inner.state.scores(),
            current_player: inner.state.current_player(),
            warning,
        }
    }

    fn emit_warning(&self, update: &ViewUpdate) {
        if let Some(message) = &update.warning {
            self.renderer.persistence_warning(message);
        }
    }

    /// Fires all four view notifications.
    fn notify_view(&self, update: &ViewUpdate) {
        self.renderer.board_changed(&update.board);
        self.renderer
            .status_changed(&update.status, update.current_player);
        self.renderer.scores_changed(&update.scores);
        self.renderer.turn_indicator_changed(update.current_player);
    }

    fn notify_all(&self, update: &ViewUpdate) {
        self.emit_warning(update);
        self.notify_view(update);
    }
}
