use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::{PlayerId, RoundId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Player with the generated "Player N" label for its id
    pub fn numbered(id: impl Into<PlayerId>) -> Self {
        let id = id.into();
        let name = format!("Player {}", id);
        Self { id, name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Round {
    pub id: RoundId,
    /// Score text keyed by player id. Values are stored as entered, never parsed.
    pub scores: BTreeMap<PlayerId, String>,
}

impl Round {
    pub fn new(id: impl Into<RoundId>) -> Self {
        Self {
            id: id.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn score_for(&self, player_id: &str) -> Option<&str> {
        self.scores.get(player_id).map(String::as_str)
    }
}

/// Immutable snapshot of the scoreboard: roster and rounds in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameState {
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
}

impl GameState {
    pub fn new(players: Vec<Player>, rounds: Vec<Round>) -> Self {
        Self { players, rounds }
    }

    /// The single-player, single-round table a reset produces
    pub fn reset() -> Self {
        Self {
            players: vec![Player::numbered("1")],
            rounds: vec![Round::new("1")],
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn round(&self, round_id: &str) -> Option<&Round> {
        self.rounds.iter().find(|r| r.id == round_id)
    }
}

/// What the presentation layer renders: the current snapshot plus the
/// enabled state of every control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameView {
    pub state: GameState,
    pub can_undo: bool,
    pub can_redo: bool,
    pub can_remove_player: bool,
    pub can_remove_round: bool,
}

impl GameView {
    pub fn new(state: GameState, can_undo: bool, can_redo: bool) -> Self {
        let can_remove_player = state.players.len() > 1;
        let can_remove_round = state.rounds.len() > 1;
        GameView {
            state,
            can_undo,
            can_redo,
            can_remove_player,
            can_remove_round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_players_serialize_as_plain_array() {
        let players = vec![Player::numbered("1"), Player::numbered("2")];
        let json = serde_json::to_string(&players).unwrap();
        assert_eq!(
            json,
            r#"[{"id":"1","name":"Player 1"},{"id":"2","name":"Player 2"}]"#
        );
    }

    #[test]
    fn test_rounds_parse_from_saved_json() {
        let saved = r#"[{"id":"1","scores":{"1":"5","2":"12"}},{"id":"2","scores":{}}]"#;
        let rounds: Vec<Round> = serde_json::from_str(saved).unwrap();

        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].score_for("1"), Some("5"));
        assert_eq!(rounds[0].score_for("2"), Some("12"));
        assert!(rounds[1].scores.is_empty());
    }

    #[test]
    fn test_reset_state() {
        let state = GameState::reset();
        assert_eq!(state.players, vec![Player::numbered("1")]);
        assert_eq!(state.rounds, vec![Round::new("1")]);
        assert_eq!(state.players[0].name, "Player 1");
    }

    #[test]
    fn test_view_control_flags() {
        let view = GameView::new(GameState::reset(), false, true);
        assert!(!view.can_remove_player);
        assert!(!view.can_remove_round);
        assert!(!view.can_undo);
        assert!(view.can_redo);

        let mut state = GameState::reset();
        state.players.push(Player::numbered("2"));
        state.rounds.push(Round::new("2"));
        let view = GameView::new(state, true, false);
        assert!(view.can_remove_player);
        assert!(view.can_remove_round);
    }
}
