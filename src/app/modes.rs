//! View mode, load status and navigation types.
//!
//! # State Machine
//!
//! Searches drive an implicit tri-state:
//!
//! ```text
//! Idle ──search──▶ Loading ──ok──▶ Idle
//!                     └────err──▶ Error ──search──▶ Loading
//! ```
//!
//! [`LoadStatus`] is derived from `CatalogState` rather than stored, so it can
//! never disagree with `is_loading` and `last_error`.

use crate::domain::CatalogEntry;
use serde::{Deserialize, Serialize};

/// Layout used to display search results. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One entry per row.
    #[default]
    List,

    /// Entries laid out in a two-column grid.
    Grid,
}

impl ViewMode {
    /// Returns the other mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_browser::ViewMode;
    ///
    /// assert_eq!(ViewMode::List.toggled(), ViewMode::Grid);
    /// assert_eq!(ViewMode::List.toggled().toggled(), ViewMode::List);
    /// ```
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::List => Self::Grid,
            Self::Grid => Self::List,
        }
    }

    /// Number of columns the results are laid out in.
    #[must_use]
    pub const fn columns(self) -> usize {
        match self {
            Self::List => 1,
            Self::Grid => 2,
        }
    }
}

/// Search lifecycle as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No fetch outstanding and the last completed fetch succeeded (or none ran).
    Idle,

    /// At least one fetch is outstanding.
    Loading,

    /// The most recent failure, shown until the next search starts.
    Error(String),
}

/// Screens the presentation layer can navigate to, with typed payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The search screen with results and the favorites strip.
    Catalog,

    /// Detail screen for a single entry.
    Detail {
        /// The entry shown; carried by value so it stays viewable after the
        /// results change underneath it.
        entry: CatalogEntry,
    },
}

impl Destination {
    /// Title shown in the navigation bar.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Catalog => "Softwares",
            Self::Detail { .. } => "Software Details",
        }
    }
}
