/// Core error types for Lark Player
use thiserror::Error;

/// Result type alias using `LarkError`
pub type Result<T> = std::result::Result<T, LarkError>;

/// Core error type for Lark Player
#[derive(Error, Debug)]
pub enum LarkError {
    /// Storage-related errors (favorite or lyric store)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Track scanning errors
    #[error("Scan error: {0}")]
    Scan(String),

    /// Playback engine could not be reached
    #[error("Playback engine unreachable: {0}")]
    EngineUnreachable(String),

    /// Playback errors reported by the engine side
    #[error("Playback error: {0}")]
    Playback(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LarkError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a scan error
    pub fn scan(msg: impl Into<String>) -> Self {
        Self::Scan(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
