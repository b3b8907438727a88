//! Error types for playback control

use lark_core::LarkError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The engine task is gone (shut down or never started)
    #[error("Playback engine unreachable")]
    EngineUnreachable,

    /// The engine command buffer is full
    #[error("Playback engine busy")]
    EngineBusy,

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Timer duration must be positive
    #[error("Invalid timer duration: {0} minutes")]
    InvalidDuration(u32),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<PlaybackError> for LarkError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::EngineUnreachable | PlaybackError::EngineBusy => {
                LarkError::EngineUnreachable(err.to_string())
            }
            PlaybackError::InvalidDuration(_) => LarkError::InvalidInput(err.to_string()),
            other => LarkError::Playback(other.to_string()),
        }
    }
}
