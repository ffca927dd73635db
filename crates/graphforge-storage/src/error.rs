use thiserror::Error;

/// Errors raised by encoding and persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("no persisted artifact found")]
    ArtifactMissing,

    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    #[error("unsupported artifact format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    /// Create a new Encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Create a new CorruptArtifact error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptArtifact(message.into())
    }
}
