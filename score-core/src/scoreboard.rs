use score_types::{GameAction, GameState, GameView};
use tracing::debug;

use crate::{HistoryLog, ScoreEvent, ScoreEventBus, ScoreEventHandler, apply};

/// Current game state paired with its undo/redo history.
///
/// Actions go through the reducer and are recorded; undo and redo install a
/// snapshot from history without recording it. Every effective change is
/// published to the registered handlers.
#[derive(Debug)]
pub struct Scoreboard {
    state: GameState,
    history: HistoryLog<GameState>,
    event_bus: ScoreEventBus,
}

impl Scoreboard {
    pub fn new(initial: GameState) -> Self {
        Self {
            history: HistoryLog::seeded(initial.clone()),
            state: initial,
            event_bus: ScoreEventBus::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn ScoreEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &HistoryLog<GameState> {
        &self.history
    }

    pub fn view(&self) -> GameView {
        GameView::new(
            self.state.clone(),
            self.history.can_undo(),
            self.history.can_redo(),
        )
    }

    /// Applies `action` and records the result. Returns false when the action
    /// left the state unchanged; nothing is recorded or published then.
    pub fn dispatch(&mut self, action: GameAction) -> bool {
        let next = apply(&self.state, &action);
        if next == self.state {
            debug!("Action {:?} left the scoreboard unchanged", action);
            return false;
        }

        self.history.record(next.clone());
        self.state = next;
        debug!(
            "Applied {:?}; history now has {} entries",
            action,
            self.history.len()
        );

        let view = self.view();
        self.event_bus
            .publish(ScoreEvent::ActionApplied { action, view });
        true
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.state = snapshot;
                let view = self.view();
                self.event_bus.publish(ScoreEvent::Undone { view });
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.state = snapshot;
                let view = self.view();
                self.event_bus.publish(ScoreEvent::Redone { view });
                true
            }
            None => false,
        }
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(GameState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_action_is_not_recorded() {
        let mut board = Scoreboard::new(GameState::reset());
        assert!(!board.dispatch(GameAction::RemoveRound));
        assert!(!board.dispatch(GameAction::RenamePlayer {
            player_id: "1".to_string(),
            name: String::new(),
        }));
        assert_eq!(board.history().len(), 1);
        assert!(!board.view().can_undo);
    }

    #[test]
    fn test_undo_does_not_record() {
        let mut board = Scoreboard::default();
        board.dispatch(GameAction::AddPlayer);
        board.dispatch(GameAction::AddPlayer);
        assert_eq!(board.history().len(), 3);

        assert!(board.undo());
        assert_eq!(board.history().len(), 3);
        assert_eq!(board.state().players.len(), 1);
        assert!(board.view().can_redo);
    }

    #[test]
    fn test_restored_state_is_undo_floor() {
        let mut board = Scoreboard::new(GameState::reset());
        assert!(!board.undo());
        board.dispatch(GameAction::AddRound);
        assert!(board.undo());
        assert_eq!(board.state(), &GameState::reset());
        assert!(!board.undo());
    }
}
