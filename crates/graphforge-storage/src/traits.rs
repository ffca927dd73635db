//! The storage contract.

use async_trait::async_trait;

use crate::artifact::SchemaArtifact;
use crate::error::StorageError;

/// Contract every artifact storage backend must satisfy.
///
/// Implementations must be safe to call from many reader threads at once.
/// `persist` must be all-or-nothing: a failed or cancelled write never
/// leaves a half-written artifact that `exists` would report as present.
#[async_trait]
pub trait SchemaStorage: Send + Sync {
    /// Writes the artifact, replacing any previous one atomically.
    async fn persist(&self, artifact: &SchemaArtifact) -> Result<(), StorageError>;

    /// Cheaply checks whether a persisted artifact is present, without
    /// decoding it. Callers use this to skip recompilation entirely.
    async fn exists(&self) -> bool;

    /// Loads the persisted artifact.
    ///
    /// # Errors
    ///
    /// [`StorageError::ArtifactMissing`] when nothing was persisted,
    /// [`StorageError::CorruptArtifact`] or
    /// [`StorageError::UnsupportedVersion`] when the artifact cannot be
    /// decoded; the caller decides whether to fall back to recompilation.
    async fn load(&self) -> Result<SchemaArtifact, StorageError>;
}
