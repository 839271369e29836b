use score_core::Scoreboard;
use score_types::{GameAction, GameView};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Result of a request against the session
#[derive(Debug, Clone)]
pub struct Outcome {
    /// False when the request was a no-op (unknown id, undo at the start of history, ...)
    pub changed: bool,
    pub view: GameView,
}

/// The single shared scoreboard every client edits.
///
/// Requests are serialized through the lock, so handlers registered on the
/// scoreboard observe changes in the order they were applied.
pub struct GameSession {
    scoreboard: RwLock<Scoreboard>,
}

impl GameSession {
    pub fn new(scoreboard: Scoreboard) -> Self {
        Self {
            scoreboard: RwLock::new(scoreboard),
        }
    }

    pub async fn apply(&self, action: GameAction) -> Outcome {
        let mut board = self.scoreboard.write().await;
        info!("Applying {:?}", action);
        let changed = board.dispatch(action);
        Outcome {
            changed,
            view: board.view(),
        }
    }

    pub async fn undo(&self) -> Outcome {
        let mut board = self.scoreboard.write().await;
        let changed = board.undo();
        if !changed {
            debug!("Nothing to undo");
        }
        Outcome {
            changed,
            view: board.view(),
        }
    }

    pub async fn redo(&self) -> Outcome {
        let mut board = self.scoreboard.write().await;
        let changed = board.redo();
        if !changed {
            debug!("Nothing to redo");
        }
        Outcome {
            changed,
            view: board.view(),
        }
    }

    pub async fn view(&self) -> GameView {
        self.scoreboard.read().await.view()
    }

    /// Reads the view and runs `f` without letting a change slip in between.
    /// Used to subscribe to updates without missing or reordering one.
    pub async fn view_with<T>(&self, f: impl FnOnce() -> T) -> (GameView, T) {
        let board = self.scoreboard.read().await;
        let extra = f();
        (board.view(), extra)
    }
}
