//! Local key-value storage.
//!
//! Modelled on browser local storage: string keys, string values, no
//! transactions. Writes are last-writer-wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use studio_core::{Result, StudioError};
use tokio::sync::RwLock;

/// Trait for local storage backends.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Get the value stored under `key`.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// All keys currently stored, sorted.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory implementation of LocalStorage. Contents are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    items: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStorage for InMemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let items = self.items.read().await;
        Ok(items.keys().cloned().collect())
    }
}

/// File-backed LocalStorage.
///
/// The whole store is one JSON object, rewritten on every change through a
/// temporary file and a rename.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = match tokio::fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                StudioError::Storage(format!("{} is not a storage file: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StudioError::Storage(format!("{}: {}", path.display(), e))),
        };

        tracing::debug!(path = %path.display(), entries = items.len(), "local storage opened");
        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(items)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl LocalStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().await;
        if items.remove(key).is_some() {
            self.persist(&items).await?;
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let items = self.items.read().await;
        Ok(items.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("studio-storage-{}", uuid::Uuid::new_v4()))
            .join("storage.json")
    }

    #[tokio::test]
    async fn test_in_memory_set_get_remove() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get_item("k").await.unwrap(), None);

        storage.set_item("k", "v1").await.unwrap();
        storage.set_item("k", "v2").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("v2"));

        storage.set_item("a", "x").await.unwrap();
        assert_eq!(storage.keys().await.unwrap(), vec!["a", "k"]);

        storage.remove_item("k").await.unwrap();
        storage.remove_item("missing").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_survives_reopen() {
        let path = scratch_path();

        let storage = FileStorage::open(&path).await.unwrap();
        assert!(storage.keys().await.unwrap().is_empty());
        storage.set_item("anoma-keypair", "{\"a\":1}").await.unwrap();
        storage.set_item("theme", "dark").await.unwrap();
        storage.remove_item("theme").await.unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).await.unwrap();
        assert_eq!(
            reopened.get_item("anoma-keypair").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(reopened.keys().await.unwrap(), vec!["anoma-keypair"]);
        assert_eq!(reopened.path(), path.as_path());

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_storage_rejects_corrupt_file() {
        let path = scratch_path();
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "[1, 2, 3]").await.unwrap();

        let err = FileStorage::open(&path).await.unwrap_err();
        assert!(matches!(err, StudioError::Storage(_)));

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }
}
