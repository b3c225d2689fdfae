//! The process-wide active key pair.
//!
//! Loaded from local storage once at start, changed only through
//! [`ActiveKeyPair::set`], which writes the new pair back. There is no delete.

use std::sync::Arc;

use studio_core::Result;
use tokio::sync::RwLock;

use crate::keypair::KeyPair;
use crate::storage::LocalStorage;

/// Storage key under which the active key pair is persisted.
pub const STORAGE_KEY: &str = "anoma-keypair";

/// Shared handle to the active key pair.
#[derive(Clone)]
pub struct ActiveKeyPair {
    current: Arc<RwLock<Option<KeyPair>>>,
    storage: Arc<dyn LocalStorage>,
}

impl ActiveKeyPair {
    /// Read the persisted key pair, if any. An unreadable record is skipped.
    pub async fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let current = match storage.get_item(STORAGE_KEY).await {
            Ok(Some(json)) => match KeyPair::import_json(&json) {
                Ok(key_pair) => {
                    tracing::info!(public_key = %key_pair.public_key, "restored stored key pair");
                    Some(key_pair)
                }
                Err(e) => {
                    tracing::warn!("Failed to load stored key pair: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to load stored key pair: {}", e);
                None
            }
        };

        Self {
            current: Arc::new(RwLock::new(current)),
            storage,
        }
    }

    /// The active key pair.
    pub async fn get(&self) -> Option<KeyPair> {
        self.current.read().await.clone()
    }

    /// The active public key.
    pub async fn public_key(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|kp| kp.public_key.clone())
    }

    /// Replace the active key pair and persist it.
    ///
    /// The in-memory pair is replaced even if persisting fails; the error is
    /// still returned.
    pub async fn set(&self, key_pair: KeyPair) -> Result<()> {
        let json = serde_json::to_string(&key_pair)?;
        {
            let mut current = self.current.write().await;
            *current = Some(key_pair);
        }
        self.storage.set_item(STORAGE_KEY, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;

    fn pair(tag: &str) -> KeyPair {
        KeyPair {
            public_key: format!("ed25519:{}", tag),
            private_key: format!("{}{}", tag, tag),
        }
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let active = ActiveKeyPair::load(Arc::new(InMemoryStorage::new())).await;
        assert!(active.get().await.is_none());
        assert!(active.public_key().await.is_none());
    }

    #[tokio::test]
    async fn test_set_persists_and_reloads() {
        let storage = Arc::new(InMemoryStorage::new());
        let active = ActiveKeyPair::load(storage.clone()).await;

        active.set(pair("aa")).await.unwrap();
        active.set(pair("bb")).await.unwrap();
        assert_eq!(active.public_key().await.as_deref(), Some("ed25519:bb"));

        let stored = storage.get_item(STORAGE_KEY).await.unwrap().unwrap();
        assert!(stored.contains("\"publicKey\":\"ed25519:bb\""));

        let reloaded = ActiveKeyPair::load(storage).await;
        assert_eq!(reloaded.get().await, Some(pair("bb")));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_ignored() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.set_item(STORAGE_KEY, "{\"publicKey\":1}").await.unwrap();

        let active = ActiveKeyPair::load(storage).await;
        assert!(active.get().await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let active = ActiveKeyPair::load(Arc::new(InMemoryStorage::new())).await;
        let other = active.clone();
        active.set(pair("cc")).await.unwrap();
        assert_eq!(other.get().await, Some(pair("cc")));
    }
}
