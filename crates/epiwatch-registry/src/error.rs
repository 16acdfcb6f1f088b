use thiserror::Error;

/// Errors of the registry subsystem.
///
/// `NotAuthorized` is normal control flow — command handlers translate it
/// into a user notice. The I/O variants are logged by callers; in-memory
/// state stays authoritative when a save fails.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Chat not authorized: {chat}")]
    NotAuthorized { chat: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
