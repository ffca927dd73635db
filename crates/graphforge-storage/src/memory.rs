//! In-process artifact storage.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::artifact::SchemaArtifact;
use crate::error::StorageError;
use crate::traits::SchemaStorage;

/// Keeps the artifact in an in-process slot.
///
/// Useful for embedded deployments that never touch disk, and for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: RwLock<Option<SchemaArtifact>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the stored artifact, if any.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

#[async_trait]
impl SchemaStorage for MemoryStorage {
    async fn persist(&self, artifact: &SchemaArtifact) -> Result<(), StorageError> {
        *self.slot.write().await = Some(artifact.clone());
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.slot.read().await.is_some()
    }

    async fn load(&self) -> Result<SchemaArtifact, StorageError> {
        self.slot
            .read()
            .await
            .clone()
            .ok_or(StorageError::ArtifactMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::FORMAT_VERSION;
    use crate::symbols::SymbolTable;

    fn artifact() -> SchemaArtifact {
        SchemaArtifact {
            format_version: FORMAT_VERSION,
            schema_key: "shop".to_string(),
            symbols: SymbolTable::identity(),
            types: vec![],
            queries: vec![],
            mutations: vec![],
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists().await);
        assert!(matches!(
            storage.load().await,
            Err(StorageError::ArtifactMissing)
        ));

        storage.persist(&artifact()).await.unwrap();
        assert!(storage.exists().await);
        assert_eq!(storage.load().await.unwrap().schema_key, "shop");

        storage.clear().await;
        assert!(!storage.exists().await);
    }
}
