//! Storage layer for persisted favorites and the last-visited marker.
//!
//! This module provides the key-value abstraction the store persists through,
//! plus the fixed key layout and two backends.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] trait
//! - `json`: JSON file-based implementation with atomic writes
//! - `memory`: process-local implementation
//! - `models`: fixed storage keys and JSON value encoding

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::KeyValueStore;
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{decode, encode, StorageKey};
