//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable key-value store persisted as a
//! single JSON document. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - the document is loaded into memory once on open
//! - **Write**: O(n) - serializes and writes the entire document
//! - **Best for**: a handful of keys with small values, infrequent writes

use crate::domain::error::{CatalogError, Result};
use crate::storage::backend::KeyValueStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Instrument;

/// JSON storage container format.
///
/// Top-level structure serialized to disk. The version allows future migrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,

    /// Stored values by key. Values are themselves JSON text.
    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            values: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// The whole document is kept in memory and rewritten on every `set`.
/// Writes are serialized, so the file always ends up holding the document of
/// the last `set` to finish and the temporary file is never shared.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "values": {
///     "favorites": "[284882215]",
///     "favoritesData": "[{\"trackId\":284882215, ...}]",
///     "lastVisited": "\"2024-05-01T10:20:30Z\""
///   }
/// }
/// ```
pub struct JsonFileStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the document, loaded on open.
    data: Mutex<StorageData>,

    /// Held from snapshot to rename by each `set`.
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Creates or opens a JSON file store.
    ///
    /// If the file exists, loads existing data. Otherwise starts empty; the file is
    /// created on the first write. Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StorageData::default()
        };

        tracing::debug!(key_count = data.values.len(), "store opened");

        Ok(Self {
            file_path,
            data: Mutex::new(data),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| CatalogError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(version = data.version, keys = data.values.len(), "loaded store data");
        Ok(data)
    }

    /// Writes `json` to a temporary sibling file and renames it over the target.
    fn write_atomically(path: &Path, json: &str) -> Result<()> {
        let tmp_path = path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StorageData>> {
        self.data
            .lock()
            .map_err(|e| CatalogError::Storage(format!("store lock poisoned: {e}")))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.lock()?.values.get(key).cloned();
        tracing::trace!(key = %key, found = value.is_some(), "json store read");
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let span = tracing::debug_span!("json_store_set", key = %key, len = value.len());

        async move {
            let _write = self.write_lock.lock().await;

            let json = {
                let mut data = self.lock()?;
                data.values.insert(key.to_string(), value);
                serde_json::to_string_pretty(&*data)
                    .map_err(|e| CatalogError::Storage(format!("failed to serialize JSON: {e}")))?
            };

            let path = self.file_path.clone();
            tokio::task::spawn_blocking(move || Self::write_atomically(&path, &json))
                .await
                .map_err(|e| CatalogError::Storage(format!("write task failed: {e}")))??;

            tracing::debug!("store saved");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("favorites").await.unwrap(), None);
        store.set("favorites", "[1,2]".to_string()).await.unwrap();
        store.set("favorites", "[2]".to_string()).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("favorites").await.unwrap().as_deref(), Some("[2]"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn concurrent_writes_keep_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).unwrap();

        let writes = (0..16).map(|i| {
            let store = &store;
            async move { store.set(&format!("key{i}"), i.to_string()).await }
        });
        for result in futures_util::future::join_all(writes).await {
            result.unwrap();
        }
        let (first, second) = tokio::join!(
            store.set("favorites", "[1]".to_string()),
            store.set("favorites", "[2]".to_string()),
        );
        first.unwrap();
        second.unwrap();
        let shown = store.get("favorites").await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        for i in 0..16 {
            let value = reopened.get(&format!("key{i}")).await.unwrap();
            assert_eq!(value, Some(i.to_string()));
        }
        assert_eq!(reopened.get("favorites").await.unwrap(), shown);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Storage(_)));
    }
}
