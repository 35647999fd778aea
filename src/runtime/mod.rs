//! The store's event loop.
//!
//! [`CatalogRuntime`] owns the [`CatalogState`] and is the only code that
//! mutates it. Intents from [`StoreHandle`]s, search completions and storage
//! worker responses are merged into one loop; each is fed through
//! [`handle_event`] and the resulting actions are executed before the next one
//! is read.
//!
//! ```text
//! StoreHandle ──┐
//! search tasks ─┼─→ run loop → handle_event → publish (watch) → actions
//! worker ───────┘                                                │
//!     ↑                                         spawn search / post to worker
//!     └──────────────────────────────────────────────────────────┘
//! ```

mod handle;

pub use handle::StoreHandle;

use crate::app::{handle_event, Action, CatalogState, Event};
use crate::search::SearchClient;
use crate::storage::KeyValueStore;
use crate::worker::{CatalogWorker, WorkerEnvelope, WorkerMessage};
use crate::SearchConfig;
use handle::Command;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Owner of the catalog state.
pub struct CatalogRuntime {
    config: SearchConfig,
    client: Arc<dyn SearchClient>,
    store: Arc<dyn KeyValueStore>,
    state: CatalogState,
    state_tx: watch::Sender<CatalogState>,
    commands_rx: mpsc::UnboundedReceiver<Command>,
    completions_tx: mpsc::UnboundedSender<Event>,
    completions_rx: mpsc::UnboundedReceiver<Event>,
}

impl CatalogRuntime {
    /// Creates a runtime with an empty state and the handle that drives it.
    ///
    /// Nothing happens until [`run`](Self::run) or [`spawn`](Self::spawn) is
    /// called; intents sent before that are queued.
    #[must_use]
    pub fn new(
        config: SearchConfig,
        client: Arc<dyn SearchClient>,
        store: Arc<dyn KeyValueStore>,
    ) -> (Self, StoreHandle) {
        let state = CatalogState::default();
        let (state_tx, state_rx) = watch::channel(state.clone());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let runtime = Self {
            config,
            client,
            store,
            state,
            state_tx,
            commands_rx,
            completions_tx,
            completions_rx,
        };

        (runtime, StoreHandle::new(commands_tx, state_rx))
    }

    /// Spawns [`run`](Self::run) on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Processes events until shutdown is requested or every handle is dropped.
    ///
    /// On exit the storage worker is drained, so writes issued before shutdown
    /// reach the store.
    pub async fn run(mut self) {
        let (worker_tx, worker_rx) = mpsc::unbounded_channel();
        let (response_tx, mut response_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(
            CatalogWorker::new(Arc::clone(&self.store))
                .run(worker_rx, response_tx)
                .instrument(tracing::debug_span!("storage_worker")),
        );

        tracing::info!(
            default_term = %self.config.default_term,
            discard_stale_results = self.config.discard_stale_results,
            "catalog store started"
        );

        let ack: Option<oneshot::Sender<()>> = loop {
            tokio::select! {
                command = self.commands_rx.recv() => match command {
                    Some(Command::Event(event)) => self.dispatch(&event, &worker_tx),
                    Some(Command::Shutdown(ack)) => break Some(ack),
                    None => break None,
                },
                Some(event) = self.completions_rx.recv() => self.dispatch(&event, &worker_tx),
                Some(response) = response_rx.recv() => {
                    self.dispatch(&Event::WorkerResponse(response), &worker_tx);
                }
            }
        };

        drop(worker_tx);
        if let Err(e) = worker.await {
            tracing::warn!(error = %e, "storage worker ended abnormally");
        }

        tracing::info!("catalog store stopped");

        if let Some(ack) = ack {
            let _ = ack.send(());
        }
    }

    fn dispatch(&mut self, event: &Event, worker_tx: &mpsc::UnboundedSender<WorkerEnvelope>) {
        let span = tracing::debug_span!("dispatch", event_type = %event.kind());
        let _guard = span.enter();

        let (changed, actions) = handle_event(&mut self.state, event, &self.config);
        if changed {
            self.state_tx.send_replace(self.state.clone());
        }

        for action in actions {
            self.execute(action, worker_tx);
        }
    }

    fn execute(&self, action: Action, worker_tx: &mpsc::UnboundedSender<WorkerEnvelope>) {
        match action {
            Action::Search { generation, term } => self.spawn_search(generation, term),
            Action::PostToWorker(message) => Self::post_to_worker(worker_tx, message),
        }
    }

    fn spawn_search(&self, generation: u64, term: String) {
        let client = Arc::clone(&self.client);
        let completions = self.completions_tx.clone();
        let span = tracing::debug_span!("search", generation = generation, term = %term);

        tokio::spawn(
            async move {
                let outcome = client.search(&term).await.map_err(|e| e.to_string());
                if completions
                    .send(Event::SearchCompleted { generation, outcome })
                    .is_err()
                {
                    tracing::debug!("store stopped before search completed");
                }
            }
            .instrument(span),
        );
    }

    fn post_to_worker(worker_tx: &mpsc::UnboundedSender<WorkerEnvelope>, message: WorkerMessage) {
        if worker_tx.send(WorkerEnvelope::in_current_span(message)).is_err() {
            tracing::warn!("storage worker is gone, message dropped");
        }
    }
}

impl std::fmt::Debug for CatalogRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogRuntime")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
