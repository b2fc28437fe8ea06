//! Token store implementations.
//!
//! `FileTokenStore` persists the bearer token to a JSON file under the
//! config directory so the session survives process restarts.
//! `InMemoryTokenStore` backs tests and throwaway sessions.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use docqa_core::error::{DocqaError, Result};
use docqa_core::session::TokenStore;

use crate::paths::DocqaPaths;

/// On-disk shape of the session file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedSession {
    token: Option<String>,
}

/// File-backed token store.
///
/// The token is cached in memory and written through to disk on every
/// `set`/`clear`, so a write is immediately visible to any other component
/// reading the store. Reads never touch the disk after construction.
pub struct FileTokenStore {
    path: PathBuf,
    cached: Arc<Mutex<Option<String>>>,
}

impl FileTokenStore {
    /// Creates a store at the default path (`~/.config/docqa/session.json`),
    /// loading any previously persisted token.
    pub async fn new() -> Result<Self> {
        let path = DocqaPaths::session_file()
            .map_err(|e| DocqaError::io(format!("Cannot resolve session file path: {}", e)))?;
        Self::with_path(path).await
    }

    /// Creates a store at a custom path (for testing).
    pub async fn with_path(path: PathBuf) -> Result<Self> {
        let initial = Self::load_from_disk(&path).await?;
        Ok(Self {
            path,
            cached: Arc::new(Mutex::new(initial)),
        })
    }

    /// Returns the path to the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn load_from_disk(path: &PathBuf) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let persisted: PersistedSession = serde_json::from_str(&content)?;
                Ok(persisted.token)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_to_disk(&self, token: &Option<String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let persisted = PersistedSession {
            token: token.clone(),
        };
        let content = serde_json::to_string_pretty(&persisted)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Option<String> {
        self.cached.lock().await.clone()
    }

    async fn set(&self, token: String) -> Result<()> {
        let mut cached = self.cached.lock().await;
        *cached = Some(token);
        self.write_to_disk(&cached).await
    }

    async fn clear(&self) -> Result<()> {
        let mut cached = self.cached.lock().await;
        *cached = None;
        self.write_to_disk(&cached).await
    }
}

/// Non-durable token store, useful for tests and one-shot commands.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    async fn set(&self, token: String) -> Result<()> {
        *self.token.lock().await = Some(token);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn starts_empty_when_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTokenStore::with_path(temp_dir.path().join("session.json"))
            .await
            .unwrap();
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn set_and_clear_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTokenStore::with_path(temp_dir.path().join("session.json"))
            .await
            .unwrap();

        store.set("tok-abc".to_string()).await.unwrap();
        assert_eq!(store.get().await, Some("tok-abc".to_string()));

        store.clear().await.unwrap();
        assert!(store.get().await.is_none());
    }

    #[tokio::test]
    async fn token_survives_reopen_from_same_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        let store = FileTokenStore::with_path(path.clone()).await.unwrap();
        store.set("tok-persist".to_string()).await.unwrap();
        drop(store);

        let reopened = FileTokenStore::with_path(path).await.unwrap();
        assert_eq!(reopened.get().await, Some("tok-persist".to_string()));
    }

    #[tokio::test]
    async fn clear_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        let store = FileTokenStore::with_path(path.clone()).await.unwrap();
        store.set("tok-gone".to_string()).await.unwrap();
        store.clear().await.unwrap();
        drop(store);

        let reopened = FileTokenStore::with_path(path).await.unwrap();
        assert!(reopened.get().await.is_none());
    }

    #[tokio::test]
    async fn in_memory_store_round_trip() {
        let store = InMemoryTokenStore::new();
        assert!(store.get().await.is_none());
        store.set("tok".to_string()).await.unwrap();
        assert_eq!(store.get().await, Some("tok".to_string()));
        store.clear().await.unwrap();
        assert!(store.get().await.is_none());
    }
}
