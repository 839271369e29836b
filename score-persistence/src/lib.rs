pub mod connection;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod store;

pub use error::{PersistenceError, Result};
pub use repositories::GameRepository;
pub use store::{DatabaseStore, KeyValueStore};
