#![allow(dead_code)]

use score_core::{ScoreEvent, ScoreEventHandler, Scoreboard};
use score_types::{GameAction, GameState};
use std::sync::{Arc, Mutex};

/// Builds a state by adding `players` players and then `rounds` rounds
pub fn create_table(players: usize, rounds: usize) -> GameState {
    let mut state = GameState::default();
    for _ in 0..players {
        state = score_core::add_player(&state);
    }
    for _ in 0..rounds {
        state = score_core::add_round(&state);
    }
    state
}

pub fn set_score(player_id: &str, round_id: &str, value: &str) -> GameAction {
    GameAction::SetScore {
        player_id: player_id.to_string(),
        round_id: round_id.to_string(),
        value: value.to_string(),
    }
}

pub fn rename(player_id: &str, name: &str) -> GameAction {
    GameAction::RenamePlayer {
        player_id: player_id.to_string(),
        name: name.to_string(),
    }
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<ScoreEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<ScoreEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last_event(&self) -> Option<ScoreEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl ScoreEventHandler for EventCollector {
    fn handle_event(&mut self, event: &ScoreEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Scoreboard starting from the empty state with a collector attached
pub fn create_observed_board() -> (Scoreboard, EventCollector) {
    let collector = EventCollector::new();
    let mut board = Scoreboard::default();
    board.add_handler(Box::new(collector.clone()));
    (board, collector)
}
