//! Sequenced, debounced persistence.
//!
//! Every scoreboard change replaces the single pending snapshot; one
//! background task waits out a debounce window from the first pending change,
//! then writes whatever is pending by then. Writes never overlap and happen at
//! most once per window, so a burst of edits (one per keystroke in a score
//! field) collapses into a few saves.

use score_core::{ScoreEvent, ScoreEventHandler};
use anyhow::Context;
use score_persistence::{GameRepository, KeyValueStore, PersistenceError};
use score_types::GameState;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Restores the saved game, or an empty board when nothing (or only half of
/// a save) is stored. Corrupt data is an error so it never gets overwritten.
pub async fn load_saved_game<S: KeyValueStore>(
    repository: &GameRepository<S>,
) -> anyhow::Result<GameState> {
    match repository.load().await {
        Ok(Some(state)) => Ok(state),
        Ok(None) => {
            info!("No saved game found, starting with an empty scoreboard");
            Ok(GameState::default())
        }
        Err(e @ PersistenceError::CorruptSaveData { .. }) => Err(anyhow::Error::new(e).context(
            "Saved game is corrupt; remove the 'players' and 'rounds' entries to start over",
        )),
        Err(e) => Err(e).context("Failed to load saved game"),
    }
}

/// Scoreboard handler that hands each new state to the save worker
pub struct SaveScheduler {
    pending: watch::Sender<Option<GameState>>,
}

impl ScoreEventHandler for SaveScheduler {
    fn handle_event(&mut self, event: &ScoreEvent) {
        self.pending.send_replace(Some(event.view().state.clone()));
    }
}

pub struct SaveWorkerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SaveWorkerHandle {
    /// Stops the worker after writing whatever is still pending
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            error!("Save worker terminated abnormally: {}", e);
        }
    }
}

struct SaveWorker<S> {
    repository: GameRepository<S>,
    pending: watch::Receiver<Option<GameState>>,
    debounce: Duration,
}

impl<S: KeyValueStore> SaveWorker<S> {
    async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        loop {
            tokio::select! {
                changed = self.pending.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    tokio::select! {
                        _ = tokio::time::sleep(self.debounce) => {}
                        _ = &mut shutdown => break,
                    }
                    self.flush().await;
                }
                _ = &mut shutdown => break,
            }
        }

        self.flush().await;
        info!("Save worker stopped");
    }

    async fn flush(&mut self) {
        let pending = self.pending.borrow_and_update().clone();
        let Some(state) = pending else {
            return;
        };

        // Failures are logged only; the in-memory scoreboard stays authoritative
        match self.repository.save(&state).await {
            Ok(()) => debug!(
                "Saved game ({} players, {} rounds)",
                state.players.len(),
                state.rounds.len()
            ),
            Err(e) => error!("Failed to save game: {}", e),
        }
    }
}

pub fn spawn_save_worker<S>(
    repository: GameRepository<S>,
    debounce: Duration,
) -> (SaveScheduler, SaveWorkerHandle)
where
    S: KeyValueStore + 'static,
{
    let (pending_tx, pending_rx) = watch::channel(None);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let worker = SaveWorker {
        repository,
        pending: pending_rx,
        debounce,
    };
    let task = tokio::spawn(worker.run(shutdown_rx));

    (
        SaveScheduler {
            pending: pending_tx,
        },
        SaveWorkerHandle {
            shutdown: shutdown_tx,
            task,
        },
    )
}
