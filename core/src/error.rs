use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Snapshot version {version} is no longer supported")]
    IncompatibleSnapshot { version: u64 },

    #[error("Storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
