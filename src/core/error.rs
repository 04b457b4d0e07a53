//! Error types for the voxsculpt core

use thiserror::Error;

/// Main error type for the editor core.
///
/// Out-of-bounds grid access is deliberately absent: the grid absorbs it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupted snapshot: expected {expected} bytes, decoded {actual}")]
    CorruptedSnapshot { expected: usize, actual: usize },

    #[error("Corrupted snapshot: invalid encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Corrupted snapshot: byte {index} holds unknown block id {value}")]
    UnknownBlock { index: usize, value: u8 },

    #[error("Persistence write failed: {0}")]
    PersistenceWrite(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for every failure that means "the stored snapshot cannot be trusted".
    pub fn is_corrupted_snapshot(&self) -> bool {
        matches!(
            self,
            Error::CorruptedSnapshot { .. } | Error::InvalidEncoding(_) | Error::UnknownBlock { .. }
        )
    }
}
