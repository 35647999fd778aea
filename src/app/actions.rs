//! Actions representing side effects to be executed by the runtime.
//!
//! This module defines the [`Action`] type, which represents imperative commands
//! produced by the event handler after a state transition. Actions bridge pure
//! state transformations and effectful operations like calling the remote
//! catalog or persisting favorites.
//!
//! # Example
//!
//! ```rust
//! use catalog_browser::app::Action;
//! use catalog_browser::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::Search { generation: 1, term: "a".to_string() },
//!     Action::PostToWorker(WorkerMessage::LoadPersisted),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Queries the remote catalog.
    ///
    /// The completion is fed back as `Event::SearchCompleted` carrying the same
    /// generation.
    Search {
        /// Generation handed out by `CatalogState::begin_search`.
        generation: u64,
        /// Term actually sent to the catalog (already defaulted and trimmed).
        term: String,
    },

    /// Posts a message to the storage worker.
    ///
    /// Used for hydration reads and fire-and-forget persistence writes.
    PostToWorker(WorkerMessage),
}
