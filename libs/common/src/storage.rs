//! Device key-value store for the ShortVid client
//!
//! This module provides a small file-backed key-value store used to hold
//! session tokens and remembered credentials between runs, with get, set
//! and remove operations. A store whose backing file is missing or
//! unreadable behaves as an empty store rather than failing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// Configuration for the key-value store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the JSON file backing the store
    pub path: PathBuf,
}

impl StoreConfig {
    /// Create a new StoreConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SHORTVID_STORE_PATH`: backing file path (default:
    ///   `$HOME/.shortvid/session.json`, falling back to
    ///   `shortvid-session.json` in the working directory)
    pub fn from_env() -> Self {
        let path = std::env::var("SHORTVID_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_store_path());

        StoreConfig { path }
    }
}

fn default_store_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".shortvid").join("session.json"),
        Err(_) => PathBuf::from("shortvid-session.json"),
    }
}

/// File-backed key-value store
pub struct KeyValueStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore {
    /// Open the store at the configured path
    ///
    /// A missing, unreadable or corrupt backing file yields an empty
    /// store; entries reappear once a set succeeds again.
    pub fn open(config: &StoreConfig) -> Self {
        let entries = match std::fs::read_to_string(&config.path) {
            Ok(contents) => match serde_json::from_str::<HashMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        "Store file {} is not valid JSON, starting empty: {}",
                        config.path.display(),
                        err
                    );
                    HashMap::new()
                }
            },
            Err(err) => {
                debug!(
                    "Store file {} not readable, starting empty: {}",
                    config.path.display(),
                    err
                );
                HashMap::new()
            }
        };

        KeyValueStore {
            path: config.path.clone(),
            entries: Mutex::new(entries),
        }
    }

    /// Get a value by key
    ///
    /// Returns `None` for missing keys; store unavailability never
    /// surfaces as an error here.
    pub async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().await;
        entries.get(key).cloned()
    }

    /// Set a key-value pair and persist the store
    pub async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    /// Remove a key and persist the store
    ///
    /// Removing an absent key is not an error.
    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        self.persist(&entries)
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::Io)?;
            }
        }

        let contents = serde_json::to_string_pretty(entries).map_err(StoreError::Serialize)?;
        std::fs::write(&self.path, contents).map_err(StoreError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, KeyValueStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = StoreConfig {
            path: dir.path().join("session.json"),
        };
        let store = KeyValueStore::open(&config);
        (dir, store)
    }

    #[tokio::test]
    async fn test_set_get_remove() -> StoreResult<()> {
        let (_dir, store) = temp_store();

        store.set("accessToken", "abc").await?;
        assert_eq!(store.get("accessToken").await, Some("abc".to_string()));

        store.remove("accessToken").await?;
        assert_eq!(store.get("accessToken").await, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_values_survive_reopen() -> StoreResult<()> {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = StoreConfig {
            path: dir.path().join("session.json"),
        };

        let store = KeyValueStore::open(&config);
        store.set("refreshToken", "def").await?;
        drop(store);

        let reopened = KeyValueStore::open(&config);
        assert_eq!(
            reopened.get("refreshToken").await,
            Some("def".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() -> StoreResult<()> {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json at all").map_err(StoreError::Io)?;

        let store = KeyValueStore::open(&StoreConfig { path });
        assert_eq!(store.get("accessToken").await, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() -> StoreResult<()> {
        let (_dir, store) = temp_store();
        store.remove("username").await?;
        Ok(())
    }
}
