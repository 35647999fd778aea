//! Storage backend abstraction.
//!
//! This module defines the [`KeyValueStore`] trait that abstracts over different
//! persistence backends. The store only needs durable string values under a
//! handful of fixed keys, so the trait is a plain get/set pair rather than a
//! generic ORM.

use crate::domain::error::Result;
use async_trait::async_trait;

/// Durable string-keyed storage surviving process restarts.
///
/// Implementations must be shareable across tasks. Each key is read and written
/// independently; no cross-key transactions are expected.
///
/// # Implementations
///
/// - [`JsonFileStore`](crate::storage::JsonFileStore): one JSON document on disk with atomic writes
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local map, for tests and ephemeral sessions
///
/// # Examples
///
/// ```
/// use catalog_browser::storage::{KeyValueStore, MemoryStore};
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let store = MemoryStore::new();
/// store.set("lastVisited", "\"2024-01-01T00:00:00Z\"".to_string()).await?;
/// assert!(store.get("lastVisited").await?.is_some());
/// # Ok::<(), catalog_browser::CatalogError>(())
/// # }).unwrap();
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key was never set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be made durable.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}
