//! Catalog Browser: the state core of a software catalog browser.
//!
//! The crate provides:
//! - Remote search against the iTunes Search API (software only)
//! - Favorites that survive restarts, cached with their full entries
//! - A list/grid layout toggle
//! - A persisted "last visited" marker
//! - A view model computed from state for any presentation layer

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Composition Root (main.rs / initialize)            │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← Event loop
//! │  - StoreHandle intents                              │
//! │  - Single owner of CatalogState                     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │  ← Business logic
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Search Layer  │   │ Storage Layer │   │ Worker Layer  │
//! │ (search/)     │   │ (storage/)    │   │ (worker/)     │
//! │ - HTTP client │   │ - JSON file   │   │ - Hydration   │
//! │ - Term rules  │   │ - In-memory   │   │ - Ordered     │
//! │               │   │ - KV trait    │   │   writes      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Catalog entry model (domain/entry)               │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing-subscriber with rotating file output     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Catalog state machine with event/action model
//! - [`domain`]: Core domain types (`CatalogEntry`, errors)
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`runtime`]: Event loop and the `StoreHandle` used to drive it
//! - [`search`]: Remote catalog client
//! - [`storage`]: Key-value persistence backends
//! - [`worker`]: Background storage worker
//! - [`observability`]: Logging setup
//!
//! # Configuration
//!
//! Configuration is read from `catalog-browser.toml` in the platform config
//! directory. Every key is optional:
//!
//! ```toml
//! [search]
//! endpoint = "https://itunes.apple.com/search"
//! default_term = "a"
//! timeout_secs = 15
//! discard_stale_results = false
//!
//! [storage]
//! data_dir = "~/.local/share/catalog-browser"
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Startup** (`main.rs`):
//!    - Load configuration
//!    - Initialize tracing
//!    - Build the search client and the JSON file store
//!    - Spawn the runtime
//!
//! 2. **Session Start** (`StoreHandle::start_session`):
//!    - Hydrate favorites and the last-visited marker through the worker
//!    - Touch the last-visited marker
//!    - Search the default term
//!
//! 3. **Interaction**:
//!    - Intents are queued on the handle and applied in order
//!    - Each applied event republishes the state
//!    - Favorites and the marker are persisted in the background
//!
//! 4. **Rendering**:
//!    - Compute the view model from a state snapshot
//!
//! # Example
//!
//! ```rust,no_run
//! use catalog_browser::{initialize, Config};
//!
//! # async fn run() -> catalog_browser::Result<()> {
//! let (runtime, store) = initialize(&Config::default())?;
//! let task = runtime.spawn();
//!
//! store.start_session()?;
//! let state = store.wait_for(|s| s.hydrated && s.applied_generation > 0).await?;
//! for row in state.compute_viewmodel(chrono::Utc::now()).rows {
//!     println!("{}", row.name);
//! }
//!
//! store.shutdown().await?;
//! let _ = task.await;
//! # Ok(())
//! # }
//! ```
//!
//! # Key Design Decisions
//!
//! ## Single Writer
//!
//! Only the runtime task mutates the state. Intents, search completions and
//! storage responses are merged into one queue, so each transition is applied
//! completely before the next one starts.
//!
//! ## Worker-Based Persistence
//!
//! Storage I/O runs on a separate worker task:
//! - The event loop never blocks on the disk
//! - Writes are applied in the order they were issued
//! - Failures are logged and never roll back in-memory state

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod search;
pub mod storage;
pub mod worker;

pub use app::{handle_event, Action, CatalogState, CatalogViewModel, Destination, Event, ViewMode};
pub use domain::{CatalogEntry, CatalogError, Result};
pub use runtime::{CatalogRuntime, StoreHandle};

use search::{ItunesClient, SearchClient, DEFAULT_TERM};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storage::{JsonFileStore, KeyValueStore, MemoryStore};

/// Default catalog endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://itunes.apple.com/search";

/// Application configuration.
///
/// Every section and key is optional; missing values take their defaults.
///
/// # Example
///
/// ```rust
/// use catalog_browser::Config;
///
/// let config = Config::from_toml_str("[search]\ndiscard_stale_results = true\n").unwrap();
/// assert!(config.search.discard_stale_results);
/// assert_eq!(config.search.default_term, "a");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Remote search settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Search endpoint URL. Default: the iTunes Search API.
    pub endpoint: String,

    /// Term searched for blank queries. Default: `"a"`
    pub default_term: String,

    /// HTTP request timeout. Default: none.
    pub timeout_secs: Option<u64>,

    /// Drop search completions older than the results already shown.
    ///
    /// Off by default: the last completion wins.
    pub discard_stale_results: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_term: DEFAULT_TERM.to_string(),
            timeout_secs: None,
            discard_stale_results: false,
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory for the store file and logs. `~` is expanded.
    ///
    /// Default: `<platform data dir>/catalog-browser`
    pub data_dir: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive such as `info` or `catalog_browser=debug`.
    ///
    /// `RUST_LOG` takes precedence. Default: `"info"`
    pub level: Option<String>,
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if the text is not valid TOML or
    /// contains unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))
    }

    /// Loads the default configuration file, falling back to defaults when it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default() -> Result<Self> {
        match infrastructure::config_file() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Resolved data directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        infrastructure::data_dir(self.storage.data_dir.as_deref())
    }
}

/// Builds the runtime and its handle from configuration.
///
/// Uses the iTunes client and the JSON file store in the data directory. If the
/// store file cannot be opened, favorites are kept in memory for this session
/// and a warning is logged.
///
/// # Errors
///
/// Returns an error if the search client cannot be built.
pub fn initialize(config: &Config) -> Result<(CatalogRuntime, StoreHandle)> {
    tracing::debug!("initializing catalog browser");

    let client: Arc<dyn SearchClient> = Arc::new(ItunesClient::from_config(&config.search)?);

    let store_path = infrastructure::store_file(&config.data_dir());
    let store: Arc<dyn KeyValueStore> = match JsonFileStore::open(&store_path) {
        Ok(store) => {
            tracing::debug!(path = %store_path.display(), "opened store");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!(
                path = %store_path.display(),
                error = %e,
                "failed to open store, favorites will not persist"
            );
            Arc::new(MemoryStore::new())
        }
    };

    Ok(CatalogRuntime::new(config.search.clone(), client, store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.search.default_term, "a");
        assert_eq!(config.search.timeout_secs, None);
        assert!(!config.search.discard_stale_results);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [search]
            timeout_secs = 10

            [storage]
            data_dir = "/tmp/catalog"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.search.timeout_secs, Some(10));
        assert_eq!(config.search.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/catalog"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[search]\nterm = \"x\"\n").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn load_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog-browser.toml");
        std::fs::write(&path, "[search]\ndefault_term = \"maps\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.search.default_term, "maps");
    }

    #[test]
    fn load_of_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[tokio::test]
    async fn initialize_falls_back_to_memory_when_store_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("store.json"), "{ not json").unwrap();
        let config = Config {
            storage: StorageConfig {
                data_dir: Some(dir.path().to_path_buf()),
            },
            ..Config::default()
        };

        let (runtime, store) = initialize(&config).unwrap();
        let task = runtime.spawn();
        store.toggle_view_mode().unwrap();
        let state = store.wait_for(|s| s.view_mode == ViewMode::Grid).await.unwrap();
        assert_eq!(state.view_mode, ViewMode::Grid);

        store.shutdown().await.unwrap();
        task.await.unwrap();
    }
}
