//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where configuration, the persisted store and the log file live.

pub mod paths;

pub use paths::{config_file, data_dir, expand_tilde, log_file, store_file};
