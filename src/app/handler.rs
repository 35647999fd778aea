//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes user intents, search
//! completions and storage worker responses, translating them into state changes
//! and action sequences.
//!
//! # Architecture
//!
//! 1. Events arrive from the presentation layer, search tasks or the worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `CatalogState` methods
//! 4. Actions are collected and returned for execution
//!
//! The handler is synchronous and runs on the single task that owns the state,
//! so every transition is applied completely before the next event is seen.
//!
//! # Example
//!
//! ```rust
//! use catalog_browser::app::{handle_event, Action, CatalogState, Event};
//! use catalog_browser::SearchConfig;
//!
//! let mut state = CatalogState::default();
//! let (changed, actions) = handle_event(
//!     &mut state,
//!     &Event::Search { query: String::new() },
//!     &SearchConfig::default(),
//! );
//! assert!(changed && state.is_loading);
//! assert_eq!(actions, vec![Action::Search { generation: 1, term: "a".to_string() }]);
//! ```

use crate::app::state::FavoriteChange;
use crate::app::{Action, CatalogState};
use crate::domain::CatalogEntry;
use crate::search::effective_term;
use crate::worker::{WorkerMessage, WorkerResponse};
use crate::SearchConfig;
use chrono::Utc;

/// Events triggered by user intents, search completions or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Load persisted favorites and the last-visited marker.
    Hydrate,

    /// Search the catalog. Blank queries use the configured default term.
    Search {
        query: String,
    },

    /// Favorite or unfavorite an entry.
    ToggleFavorite(i64),

    /// Switch between list and grid layout.
    ToggleViewMode,

    /// Record the current time as the last visit.
    TouchLastVisited,

    /// A search task finished.
    SearchCompleted {
        /// Generation the search was started with.
        generation: u64,
        /// Entries on success, the user-facing message on failure.
        outcome: Result<Vec<CatalogEntry>, String>,
    },

    /// Wraps a response from the storage worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// Returns whether the state changed (and should be republished) together with
/// the actions to run, in order.
#[allow(clippy::too_many_lines)]
pub fn handle_event(
    state: &mut CatalogState,
    event: &Event,
    config: &SearchConfig,
) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = %event.kind()).entered();

    match event {
        Event::Hydrate => {
            tracing::debug!("requesting persisted state");
            (false, vec![Action::PostToWorker(WorkerMessage::LoadPersisted)])
        }
        Event::Search { query } => {
            let term = effective_term(query, &config.default_term);
            let generation = state.begin_search();
            tracing::debug!(term = %term, generation = generation, "search started");
            (true, vec![Action::Search { generation, term }])
        }
        Event::SearchCompleted { generation, outcome } => {
            let applied = state.finish_search(*generation, outcome.clone(), config.discard_stale_results);
            match outcome {
                Ok(entries) => tracing::debug!(
                    generation = generation,
                    count = entries.len(),
                    applied = ?applied,
                    "search completed"
                ),
                Err(message) => tracing::warn!(
                    generation = generation,
                    error = %message,
                    applied = ?applied,
                    "search failed"
                ),
            }
            (true, vec![])
        }
        Event::ToggleFavorite(id) => {
            let change = state.toggle_favorite(*id);
            debug_assert!(state.favorites_consistent());

            if !change.is_change() {
                return (false, vec![]);
            }

            tracing::debug!(
                id = id,
                added = change == FavoriteChange::Added,
                favorites = state.favorite_ids().len(),
                "favorites changed"
            );

            (
                true,
                vec![Action::PostToWorker(WorkerMessage::SaveFavorites {
                    ids: state.favorite_ids().to_vec(),
                    entries: state.favorite_entries().to_vec(),
                })],
            )
        }
        Event::ToggleViewMode => {
            state.toggle_view_mode();
            tracing::debug!(view_mode = ?state.view_mode, "view mode toggled");
            (true, vec![])
        }
        Event::TouchLastVisited => {
            let now = Utc::now();
            state.touch_last_visited(now);
            (
                true,
                vec![Action::PostToWorker(WorkerMessage::SaveLastVisited { at: now })],
            )
        }
        Event::WorkerResponse(response) => match response {
            WorkerResponse::PersistedLoaded {
                favorite_ids,
                favorite_entries,
                last_visited_at,
            } => {
                state.apply_hydration(
                    favorite_ids.clone(),
                    favorite_entries.clone(),
                    *last_visited_at,
                    Utc::now(),
                );
                tracing::debug!(
                    favorites = state.favorite_ids().len(),
                    last_visited_at = %state.last_visited_at,
                    "state hydrated"
                );
                (true, vec![])
            }
            WorkerResponse::FavoritesSaved { .. } | WorkerResponse::LastVisitedSaved => {
                (false, vec![])
            }
            WorkerResponse::Error { message } => {
                tracing::warn!(error = %message, "persistence failed, keeping in-memory state");
                (false, vec![])
            }
        },
    }
}

impl Event {
    /// Variant name, used as a span field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Hydrate => "Hydrate",
            Self::Search { .. } => "Search",
            Self::ToggleFavorite(_) => "ToggleFavorite",
            Self::ToggleViewMode => "ToggleViewMode",
            Self::TouchLastVisited => "TouchLastVisited",
            Self::SearchCompleted { .. } => "SearchCompleted",
            Self::WorkerResponse(_) => "WorkerResponse",
        }
    }
}
