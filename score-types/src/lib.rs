pub mod game;
pub mod messages;

pub type PlayerId = String;
pub type RoundId = String;

// Re-export all types
pub use game::*;
pub use messages::*;
