//! In-process storage backend.
//!
//! Keeps values in a map for the lifetime of the process. Used by tests and as
//! the fallback when the on-disk store cannot be opened.

use crate::domain::error::{CatalogError, Result};
use crate::storage::backend::KeyValueStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Non-durable [`KeyValueStore`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `(key, value)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_browser::storage::MemoryStore;
    ///
    /// let store = MemoryStore::with_values([("favorites", "[1]")]);
    /// assert_eq!(store.len(), 1);
    /// ```
    #[must_use]
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().map_or(0, |values| values.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|e| CatalogError::Storage(format!("store lock poisoned: {e}")))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }
}
