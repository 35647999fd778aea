//! Domain layer for the catalog browser.
//!
//! This module contains the core domain types, independent of the network client,
//! the storage backend and the async runtime.
//!
//! # Organization
//!
//! - [`entry`]: Catalog entry model and its wire/persisted representation
//! - [`error`]: Error types and result aliases
//! - [`visit`]: Last-visited marker formatting

pub mod entry;
pub mod error;
pub mod visit;

pub use entry::CatalogEntry;
pub use error::{CatalogError, Result};
pub use visit::time_ago;
