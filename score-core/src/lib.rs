pub mod game_events;
pub mod game_state;
pub mod history;
pub mod scoreboard;

// Re-export main components
pub use game_events::*;
pub use game_state::*;
pub use history::*;
pub use scoreboard::*;
