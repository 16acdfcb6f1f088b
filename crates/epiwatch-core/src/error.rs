use thiserror::Error;

#[derive(Debug, Error)]
pub enum EpiwatchError {
    /// Fatal at startup only — a missing bot token or a bad cron pattern.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EpiwatchError>;
