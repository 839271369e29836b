pub mod game_repository;

pub use game_repository::{GameRepository, PLAYERS_KEY, ROUNDS_KEY};
