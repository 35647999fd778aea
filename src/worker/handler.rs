//! Storage worker implementation.
//!
//! The worker owns the store's side of persistence. It runs as a single task
//! draining its inbox in order, so writes reach the backend in the order the
//! event loop issued them, and callers never wait on them.

use crate::domain::error::Result;
use crate::domain::CatalogEntry;
use crate::storage::{decode, encode, KeyValueStore, StorageKey};
use crate::worker::{WorkerEnvelope, WorkerMessage, WorkerResponse};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::Instrument;

/// Worker state for handling storage operations.
pub struct CatalogWorker {
    store: Arc<dyn KeyValueStore>,
}

impl CatalogWorker {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Processes messages until the inbox closes, posting each response to
    /// `outbox`.
    ///
    /// Returns once every queued message has been handled, which is what makes
    /// shutdown flush pending writes.
    pub async fn run(
        self,
        mut inbox: UnboundedReceiver<WorkerEnvelope>,
        outbox: UnboundedSender<WorkerResponse>,
    ) {
        tracing::debug!("storage worker started");

        while let Some(WorkerEnvelope { message, span }) = inbox.recv().await {
            let response = self.handle_message(message).instrument(span).await;
            if outbox.send(response).is_err() {
                tracing::trace!("event loop gone, response dropped");
            }
        }

        tracing::debug!("storage worker stopped");
    }

    /// Processes a worker message and returns the appropriate response.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", message_type = %message_kind(&message));

        async {
            match message {
                WorkerMessage::LoadPersisted => self.handle_load_persisted().await,
                WorkerMessage::SaveFavorites { ids, entries } => {
                    self.handle_save_favorites(&ids, &entries).await
                }
                WorkerMessage::SaveLastVisited { at } => self.handle_save_last_visited(at).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Reads the three persisted keys independently.
    async fn handle_load_persisted(&self) -> WorkerResponse {
        let (favorite_ids, favorite_entries, last_visited_at) = futures_util::future::join3(
            self.read::<Vec<i64>>(StorageKey::FavoriteIds),
            self.read::<Vec<CatalogEntry>>(StorageKey::FavoriteEntries),
            self.read::<DateTime<Utc>>(StorageKey::LastVisited),
        )
        .await;

        tracing::debug!(
            has_ids = favorite_ids.is_some(),
            has_entries = favorite_entries.is_some(),
            has_last_visited = last_visited_at.is_some(),
            "persisted state loaded"
        );

        WorkerResponse::PersistedLoaded {
            favorite_ids,
            favorite_entries,
            last_visited_at,
        }
    }

    async fn handle_save_favorites(
        &self,
        ids: &[i64],
        entries: &[CatalogEntry],
    ) -> WorkerResponse {
        let count = ids.len();
        let ids_written = self.write(StorageKey::FavoriteIds, ids).await;
        let entries_written = self.write(StorageKey::FavoriteEntries, entries).await;

        Self::handle_store_result("save favorites", ids_written.and(entries_written), |()| {
            WorkerResponse::FavoritesSaved { count }
        })
    }

    async fn handle_save_last_visited(&self, at: DateTime<Utc>) -> WorkerResponse {
        Self::handle_store_result(
            "save last visited",
            self.write(StorageKey::LastVisited, &at).await,
            |()| WorkerResponse::LastVisitedSaved,
        )
    }

    /// Reads and decodes one key, treating every failure as absence.
    async fn read<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        match self.store.get(key.as_str()).await {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "stored value unreadable, using default");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key = %key, "nothing stored, using default");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "storage read failed, using default");
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized + Sync>(&self, key: StorageKey, value: &T) -> Result<()> {
        let raw = encode(value)?;
        self.store.set(key.as_str(), raw).await
    }

    /// Helper for handling storage operation results with consistent logging.
    fn handle_store_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }
}

const fn message_kind(message: &WorkerMessage) -> &'static str {
    match message {
        WorkerMessage::LoadPersisted => "LoadPersisted",
        WorkerMessage::SaveFavorites { .. } => "SaveFavorites",
        WorkerMessage::SaveLastVisited { .. } => "SaveLastVisited",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogError;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    /// Store whose reads and writes always fail.
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(CatalogError::Storage("disk unavailable".into()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<()> {
            Err(CatalogError::Storage("disk full".into()))
        }
    }

    #[tokio::test]
    async fn load_reports_absent_keys_as_none() {
        let worker = CatalogWorker::new(Arc::new(MemoryStore::new()));
        let response = worker.handle_message(WorkerMessage::LoadPersisted).await;
        assert_eq!(
            response,
            WorkerResponse::PersistedLoaded {
                favorite_ids: None,
                favorite_entries: None,
                last_visited_at: None,
            }
        );
    }

    #[tokio::test]
    async fn unreadable_values_are_treated_as_absent() {
        let store = MemoryStore::with_values([
            ("favorites", "[1, 2]"),
            ("favoritesData", "{broken"),
            ("lastVisited", "\"not a date\""),
        ]);
        let worker = CatalogWorker::new(Arc::new(store));

        let WorkerResponse::PersistedLoaded {
            favorite_ids,
            favorite_entries,
            last_visited_at,
        } = worker.handle_message(WorkerMessage::LoadPersisted).await
        else {
            panic!("expected PersistedLoaded");
        };
        assert_eq!(favorite_ids, Some(vec![1, 2]));
        assert_eq!(favorite_entries, None);
        assert_eq!(last_visited_at, None);
    }

    #[tokio::test]
    async fn saved_values_load_back() {
        let worker = CatalogWorker::new(Arc::new(MemoryStore::new()));
        let at: DateTime<Utc> = "2024-05-01T10:20:30Z".parse().unwrap();
        let entries = vec![CatalogEntry::new(5, "E")];

        let saved = worker
            .handle_message(WorkerMessage::SaveFavorites { ids: vec![5], entries: entries.clone() })
            .await;
        assert_eq!(saved, WorkerResponse::FavoritesSaved { count: 1 });
        worker.handle_message(WorkerMessage::SaveLastVisited { at }).await;

        assert_eq!(
            worker.handle_message(WorkerMessage::LoadPersisted).await,
            WorkerResponse::PersistedLoaded {
                favorite_ids: Some(vec![5]),
                favorite_entries: Some(entries),
                last_visited_at: Some(at),
            }
        );
    }

    #[tokio::test]
    async fn storage_failures_become_error_responses() {
        let worker = CatalogWorker::new(Arc::new(BrokenStore));

        let loaded = worker.handle_message(WorkerMessage::LoadPersisted).await;
        assert!(matches!(loaded, WorkerResponse::PersistedLoaded { favorite_ids: None, .. }));

        let saved = worker
            .handle_message(WorkerMessage::SaveLastVisited { at: Utc::now() })
            .await;
        assert!(matches!(saved, WorkerResponse::Error { message } if message.contains("disk full")));
    }
}
