//! Pure mutators over [`GameState`].
//!
//! Every function takes the current snapshot by reference and returns a new
//! one; a snapshot already handed out (for example to the history log) is
//! never modified. Unknown ids and out-of-range requests are no-ops, so none
//! of these functions can fail.

use score_types::{GameAction, GameState, Player, Round};

/// Next free id derived from the collection size. Only walks forward when a
/// player or round in the middle was removed and `len + 1` is already taken.
fn next_id(len: usize, mut taken: impl FnMut(&str) -> bool) -> String {
    let mut candidate = len + 1;
    while taken(&candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

pub fn add_player(state: &GameState) -> GameState {
    let id = next_id(state.players.len(), |id| state.player(id).is_some());
    let mut players = state.players.clone();
    players.push(Player::numbered(id));
    GameState::new(players, state.rounds.clone())
}

/// Drops the player from the roster. Scores already entered for the player
/// stay in their rounds.
pub fn remove_player(state: &GameState, player_id: &str) -> GameState {
    let players = state
        .players
        .iter()
        .filter(|p| p.id != player_id)
        .cloned()
        .collect();
    GameState::new(players, state.rounds.clone())
}

pub fn remove_last_player(state: &GameState) -> GameState {
    match state.players.last() {
        Some(last) => remove_player(state, &last.id),
        None => state.clone(),
    }
}

pub fn add_round(state: &GameState) -> GameState {
    let id = next_id(state.rounds.len(), |id| state.round(id).is_some());
    let mut rounds = state.rounds.clone();
    rounds.push(Round::new(id));
    GameState::new(state.players.clone(), rounds)
}

/// Removes the final round. There is always at least one round left.
pub fn remove_round(state: &GameState) -> GameState {
    if state.rounds.len() <= 1 {
        return state.clone();
    }
    let rounds = state.rounds[..state.rounds.len() - 1].to_vec();
    GameState::new(state.players.clone(), rounds)
}

pub fn set_score(state: &GameState, player_id: &str, round_id: &str, value: &str) -> GameState {
    let rounds = state
        .rounds
        .iter()
        .map(|round| {
            if round.id == round_id {
                let mut round = round.clone();
                round.scores.insert(player_id.to_string(), value.to_string());
                round
            } else {
                round.clone()
            }
        })
        .collect();
    GameState::new(state.players.clone(), rounds)
}

pub fn rename_player(state: &GameState, player_id: &str, new_name: &str) -> GameState {
    if new_name.is_empty() || player_id.is_empty() {
        return state.clone();
    }
    let players = state
        .players
        .iter()
        .map(|player| {
            if player.id == player_id {
                Player {
                    id: player.id.clone(),
                    name: new_name.to_string(),
                }
            } else {
                player.clone()
            }
        })
        .collect();
    GameState::new(players, state.rounds.clone())
}

pub fn reset_game(_state: &GameState) -> GameState {
    GameState::reset()
}

/// Reducer: `(state, action) -> state'`
pub fn apply(state: &GameState, action: &GameAction) -> GameState {
    match action {
        GameAction::AddPlayer => add_player(state),
        GameAction::RemovePlayer { player_id } => remove_player(state, player_id),
        GameAction::RemoveLastPlayer => remove_last_player(state),
        GameAction::AddRound => add_round(state),
        GameAction::RemoveRound => remove_round(state),
        GameAction::SetScore {
            player_id,
            round_id,
            value,
        } => set_score(state, player_id, round_id, value),
        GameAction::RenamePlayer { player_id, name } => rename_player(state, player_id, name),
        GameAction::ResetGame => reset_game(state),
    }
}
