use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("corrupt save data under key '{key}': {source}")]
    CorruptSaveData {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize game state: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
