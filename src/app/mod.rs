//! Application layer coordinating state, events, and actions.
//!
//! This module defines the core catalog logic, sitting between the runtime
//! (the store's event loop) and the domain/search/worker layers.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Intents → Events → Event Handler → State Mutations → Actions → Side Effects
//!                         ↑                                   ↓
//!                         └── Search completions / Worker ────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Layout, load status and navigation types
//! - [`state`]: Central catalog state container
//! - [`viewmodel`]: Read model computed from the state for presentation
//!
//! # Example
//!
//! ```rust
//! use catalog_browser::app::{handle_event, CatalogState, Event};
//! use catalog_browser::SearchConfig;
//!
//! let mut state = CatalogState::default();
//! let (_, actions) = handle_event(&mut state, &Event::ToggleViewMode, &SearchConfig::default());
//! assert!(actions.is_empty());
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;
pub mod viewmodel;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{Destination, LoadStatus, ViewMode};
pub use state::{CatalogState, FavoriteChange, SearchApplied};
pub use viewmodel::{CatalogViewModel, EntryRow, FavoriteChip, StatusLine};
