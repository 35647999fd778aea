//! Cloneable handle to a running catalog store.

use crate::app::{CatalogState, Event};
use crate::domain::{CatalogError, Result};
use tokio::sync::{mpsc, oneshot, watch};

/// Commands accepted by the event loop.
#[derive(Debug)]
pub(crate) enum Command {
    Event(Event),
    /// Stop after flushing pending writes, then acknowledge.
    Shutdown(oneshot::Sender<()>),
}

/// Handle used by the presentation layer to drive and observe the store.
///
/// Intents are queued and applied in the order they were issued. They return
/// as soon as the intent is queued; observe the outcome through
/// [`snapshot`](Self::snapshot), [`subscribe`](Self::subscribe) or
/// [`wait_for`](Self::wait_for).
#[derive(Debug, Clone)]
pub struct StoreHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<CatalogState>,
}

impl StoreHandle {
    pub(crate) fn new(
        commands: mpsc::UnboundedSender<Command>,
        state: watch::Receiver<CatalogState>,
    ) -> Self {
        Self { commands, state }
    }

    /// Loads persisted favorites and the last-visited marker.
    ///
    /// Loaded favorites replace the in-memory set. A favorite toggled before
    /// `hydrated` is set is lost in memory while its write still reaches
    /// storage, so wait for it first:
    ///
    /// ```rust,no_run
    /// # async fn example(store: catalog_browser::StoreHandle) -> catalog_browser::Result<()> {
    /// store.hydrate()?;
    /// store.wait_for(|s| s.hydrated).await?;
    /// store.toggle_favorite(284_882_215)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Runtime`] if the store has stopped.
    pub fn hydrate(&self) -> Result<()> {
        self.send(Event::Hydrate)
    }

    /// Searches the catalog for `query`; blank queries use the default term.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Runtime`] if the store has stopped.
    pub fn search(&self, query: impl Into<String>) -> Result<()> {
        self.send(Event::Search {
            query: query.into(),
        })
    }

    /// Favorites `id` if it is in the current results, or unfavorites it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Runtime`] if the store has stopped.
    pub fn toggle_favorite(&self, id: i64) -> Result<()> {
        self.send(Event::ToggleFavorite(id))
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::Runtime`] if the store has stopped.
    pub fn toggle_view_mode(&self) -> Result<()> {
        self.send(Event::ToggleViewMode)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::Runtime`] if the store has stopped.
    pub fn touch_last_visited(&self) -> Result<()> {
        self.send(Event::TouchLastVisited)
    }

    /// Runs the app-open sequence: hydrate, touch the last-visited marker, then
    /// search the default term.
    ///
    /// Hydration completes after the touch, so the in-memory marker shows the
    /// previous visit while the store already holds the current one.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Runtime`] if the store has stopped.
    pub fn start_session(&self) -> Result<()> {
        self.hydrate()?;
        self.touch_last_visited()?;
        self.search(String::new())
    }

    /// Stops the store and waits until every queued write reached storage.
    ///
    /// Intents issued before the call are still applied. Searches in flight are
    /// abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Runtime`] if the store had already stopped.
    pub async fn shutdown(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.commands
            .send(Command::Shutdown(ack_tx))
            .map_err(|_| stopped())?;
        ack_rx.await.map_err(|_| stopped())
    }

    /// Returns a copy of the latest published state.
    #[must_use]
    pub fn snapshot(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.clone()
    }

    /// Waits until the published state satisfies `predicate` and returns it.
    ///
    /// The current state is checked first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Runtime`] if the store stops before the predicate
    /// holds.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&CatalogState) -> bool,
    ) -> Result<CatalogState> {
        let mut state = self.state.clone();
        let matched = state.wait_for(predicate).await.map_err(|_| stopped())?;
        Ok(matched.clone())
    }

    fn send(&self, event: Event) -> Result<()> {
        tracing::trace!(event_type = %event.kind(), "queueing intent");
        self.commands
            .send(Command::Event(event))
            .map_err(|_| stopped())
    }
}

fn stopped() -> CatalogError {
    CatalogError::Runtime("catalog store is not running".to_string())
}
