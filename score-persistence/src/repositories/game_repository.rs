use score_types::{GameState, Player, Round};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{PersistenceError, Result};
use crate::store::KeyValueStore;

pub const PLAYERS_KEY: &str = "players";
pub const ROUNDS_KEY: &str = "rounds";

/// Saves and restores the scoreboard as two JSON arrays under
/// [`PLAYERS_KEY`] and [`ROUNDS_KEY`].
pub struct GameRepository<S> {
    store: S,
}

impl<S: KeyValueStore> GameRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
        serde_json::from_str(raw).map_err(|source| PersistenceError::CorruptSaveData {
            key: key.to_string(),
            source,
        })
    }

    /// Returns `None` unless both keys hold a value
    pub async fn load(&self) -> Result<Option<GameState>> {
        let players = self.store.get(PLAYERS_KEY).await?;
        let rounds = self.store.get(ROUNDS_KEY).await?;

        let (players, rounds) = match (players, rounds) {
            (Some(players), Some(rounds)) => (players, rounds),
            (players, rounds) => {
                debug!(
                    "No saved game (players present: {}, rounds present: {})",
                    players.is_some(),
                    rounds.is_some()
                );
                return Ok(None);
            }
        };

        let players: Vec<Player> = Self::decode(PLAYERS_KEY, &players)?;
        let rounds: Vec<Round> = Self::decode(ROUNDS_KEY, &rounds)?;

        info!(
            "Restored saved game with {} players and {} rounds",
            players.len(),
            rounds.len()
        );
        Ok(Some(GameState::new(players, rounds)))
    }

    pub async fn save(&self, state: &GameState) -> Result<()> {
        let players = serde_json::to_string(&state.players)?;
        let rounds = serde_json::to_string(&state.rounds)?;

        self.store
            .set_many(&[(PLAYERS_KEY, players), (ROUNDS_KEY, rounds)])
            .await
    }
}
