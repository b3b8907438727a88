//! Error types for library scanning

use lark_core::LarkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scan root not found: {0}")]
    RootNotFound(String),

    #[error("Invalid scan root: {0}")]
    InvalidPath(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Scan task interrupted: {0}")]
    Interrupted(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

impl From<ScanError> for LarkError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Io(e) => LarkError::Io(e),
            other => LarkError::Scan(other.to_string()),
        }
    }
}
