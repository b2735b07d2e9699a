use thiserror::Error;

/// Rejections raised by the roster itself. Each leaves the roster untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("Player name cannot be empty.")]
    EmptyName,

    #[error("Add some players first!")]
    EmptyRoster,

    #[error("No player ids left to assign.")]
    IdsExhausted,
}

/// Failures at the storage or file boundary. The UI reports these and keeps
/// running on the in-memory roster.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode roster snapshot")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode roster snapshot")]
    Decode(#[source] serde_json::Error),

    #[error("stored roster is invalid: {0}")]
    CorruptSnapshot(String),

    #[error("storage backend error")]
    Storage(#[from] rusqlite::Error),

    #[error("file system error")]
    Io(#[from] std::io::Error),
}
