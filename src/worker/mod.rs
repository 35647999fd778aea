//! Background storage worker.
//!
//! All persistence I/O runs on this worker so the event loop never blocks on
//! storage. Hydration reads are answered with a response; writes are
//! fire-and-forget from the store's point of view.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::CatalogWorker;
pub use messages::{WorkerEnvelope, WorkerMessage, WorkerResponse};
