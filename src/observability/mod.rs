//! Structured logging to a rotating file.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter (rotating) → catalog-browser.log
//! ```
//!
//! # Features
//!
//! - **File Output**: Events written to `catalog-browser.log` in the data directory
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **Span Context**: Events carry the spans of the event loop and worker
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `logging.level` in the configuration file
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

pub mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
