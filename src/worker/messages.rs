//! Storage worker message types.
//!
//! This module defines the request and response protocol between the store's
//! event loop and the background storage worker. Requests carry typed values;
//! encoding to the persisted JSON layout happens inside the worker.

use crate::domain::CatalogEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Messages sent from the event loop to the storage worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the favorites and last-visited keys for hydration.
    LoadPersisted,

    /// Overwrite both favorites keys with the current favorites.
    SaveFavorites {
        /// Favorited ids in display order.
        ids: Vec<i64>,
        /// Cached entries, parallel to `ids`.
        entries: Vec<CatalogEntry>,
    },

    /// Overwrite the last-visited key.
    SaveLastVisited {
        at: DateTime<Utc>,
    },
}

/// Responses sent from the storage worker back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Persisted values were read. Each field is `None` when the key was absent
    /// or unreadable.
    PersistedLoaded {
        favorite_ids: Option<Vec<i64>>,
        favorite_entries: Option<Vec<CatalogEntry>>,
        last_visited_at: Option<DateTime<Utc>>,
    },

    /// Favorites were written.
    FavoritesSaved {
        /// Number of favorites written.
        count: usize,
    },

    /// The last-visited marker was written.
    LastVisitedSaved,

    /// A write failed. Never surfaced to the user.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

/// A message together with the span it was issued under, so the worker's logs
/// nest under the operation that caused them.
#[derive(Debug)]
pub struct WorkerEnvelope {
    pub message: WorkerMessage,
    pub span: tracing::Span,
}

impl WorkerEnvelope {
    /// Wraps `message` with the current span.
    #[must_use]
    pub fn in_current_span(message: WorkerMessage) -> Self {
        Self {
            message,
            span: tracing::Span::current(),
        }
    }
}
