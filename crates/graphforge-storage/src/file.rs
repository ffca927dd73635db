//! File-backed artifact storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::artifact::SchemaArtifact;
use crate::error::StorageError;
use crate::traits::SchemaStorage;

/// Stores the artifact as a JSON file.
///
/// Writes go to a temp sibling first and are renamed into place, so readers
/// either see the previous artifact or the complete new one, never a
/// partial write. A cancelled build leaves at most a stale temp file that
/// the next persist overwrites.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SchemaStorage for FileStorage {
    async fn persist(&self, artifact: &SchemaArtifact) -> Result<(), StorageError> {
        let bytes = artifact.to_canonical_json()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        info!(
            path = %self.path.display(),
            schema_key = %artifact.schema_key,
            bytes = bytes.len(),
            "Persisted schema artifact"
        );
        Ok(())
    }

    async fn exists(&self) -> bool {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.is_file() && meta.len() > 0,
            Err(_) => false,
        }
    }

    async fn load(&self) -> Result<SchemaArtifact, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::ArtifactMissing);
            }
            Err(e) => return Err(e.into()),
        };
        debug!(path = %self.path.display(), bytes = bytes.len(), "Loading schema artifact");
        SchemaArtifact::from_json(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::FORMAT_VERSION;
    use crate::symbols::SymbolTable;

    fn artifact(key: &str) -> SchemaArtifact {
        SchemaArtifact {
            format_version: FORMAT_VERSION,
            schema_key: key.to_string(),
            symbols: SymbolTable::identity(),
            types: vec![],
            queries: vec![],
            mutations: vec![],
        }
    }

    #[tokio::test]
    async fn test_persist_then_exists_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("shop.json"));

        assert!(!storage.exists().await);
        storage.persist(&artifact("shop")).await.unwrap();
        assert!(storage.exists().await);

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.schema_key, "shop");
    }

    #[tokio::test]
    async fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        let err = storage.load().await.unwrap_err();
        assert!(matches!(err, StorageError::ArtifactMissing));
    }

    #[tokio::test]
    async fn test_load_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.json");
        tokio::fs::write(&path, b"{ truncated").await.unwrap();

        let storage = FileStorage::new(&path);
        // Present but unreadable: the caller decides whether to recompile.
        assert!(storage.exists().await);
        let err = storage.load().await.unwrap_err();
        assert!(matches!(err, StorageError::CorruptArtifact(_)));
    }

    #[tokio::test]
    async fn test_persist_replaces_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("shop.json"));

        storage.persist(&artifact("first")).await.unwrap();
        storage.persist(&artifact("second")).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.schema_key, "second");
        // No temp file left behind.
        assert!(tokio::fs::metadata(storage.temp_path()).await.is_err());
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested/deep/shop.json"));
        storage.persist(&artifact("shop")).await.unwrap();
        assert!(storage.exists().await);
    }
}
