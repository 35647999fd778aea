//! End-to-end behavior of the catalog store through its handle.

use async_trait::async_trait;
use catalog_browser::search::SearchClient;
use catalog_browser::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use catalog_browser::{
    CatalogEntry, CatalogError, CatalogRuntime, CatalogState, Result, SearchConfig, StoreHandle,
    ViewMode,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Search client answering from a fixed table, optionally after a delay.
#[derive(Default)]
struct StubClient {
    answers: HashMap<String, (Duration, std::result::Result<Vec<CatalogEntry>, String>)>,
    terms: Mutex<Vec<String>>,
}

impl StubClient {
    fn answer(mut self, term: &str, entries: Vec<CatalogEntry>) -> Self {
        self.answers.insert(term.to_string(), (Duration::ZERO, Ok(entries)));
        self
    }

    fn answer_after(mut self, term: &str, delay: Duration, entries: Vec<CatalogEntry>) -> Self {
        self.answers.insert(term.to_string(), (delay, Ok(entries)));
        self
    }

    fn fail(mut self, term: &str, message: &str) -> Self {
        self.answers
            .insert(term.to_string(), (Duration::ZERO, Err(message.to_string())));
        self
    }

    fn terms(&self) -> Vec<String> {
        self.terms.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for StubClient {
    async fn search(&self, term: &str) -> Result<Vec<CatalogEntry>> {
        self.terms.lock().unwrap().push(term.to_string());
        let (delay, answer) = self
            .answers
            .get(term)
            .cloned()
            .unwrap_or((Duration::ZERO, Ok(Vec::new())));
        tokio::time::sleep(delay).await;
        answer.map_err(CatalogError::Search)
    }
}

fn app(id: i64, name: &str) -> CatalogEntry {
    CatalogEntry::new(id, name)
}

fn start(
    config: SearchConfig,
    client: Arc<StubClient>,
    store: Arc<dyn KeyValueStore>,
) -> (StoreHandle, tokio::task::JoinHandle<()>) {
    let (runtime, handle) = CatalogRuntime::new(config, client, store);
    (handle, runtime.spawn())
}

async fn settled(handle: &StoreHandle, searches: u64) -> CatalogState {
    handle
        .wait_for(|s| s.search_generation >= searches && s.pending_searches == 0)
        .await
        .unwrap()
}

async fn stop(handle: StoreHandle, task: tokio::task::JoinHandle<()>) {
    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn session_start_hydrates_touches_and_searches_the_default_term() {
    let visited: DateTime<Utc> = "2024-01-01T08:00:00Z".parse().unwrap();
    let store = Arc::new(MemoryStore::with_values([
        ("favorites", "[5]"),
        ("favoritesData", r#"[{"trackId": 5, "trackName": "Five"}]"#),
        ("lastVisited", "\"2024-01-01T08:00:00Z\""),
    ]));
    let client = Arc::new(StubClient::default().answer("a", vec![app(1, "One"), app(5, "Five")]));
    let (handle, task) = start(SearchConfig::default(), client.clone(), store.clone());

    let before = Utc::now();
    handle.start_session().unwrap();
    let state = handle
        .wait_for(|s| s.hydrated && s.applied_generation == 1 && !s.is_loading)
        .await
        .unwrap();

    assert_eq!(client.terms(), ["a"]);
    assert_eq!(state.favorite_ids(), [5]);
    assert_eq!(state.last_visited_at, visited);
    let rows = state.compute_viewmodel(Utc::now()).rows;
    assert_eq!(rows.iter().map(|r| r.is_favorite).collect::<Vec<_>>(), [false, true]);

    stop(handle, task).await;

    let stored = store.get("lastVisited").await.unwrap().unwrap();
    let stored: DateTime<Utc> = serde_json::from_str(&stored).unwrap();
    assert!(stored >= before);
}

#[tokio::test]
async fn blank_queries_search_the_default_term() {
    let client = Arc::new(StubClient::default());
    let (handle, task) = start(SearchConfig::default(), client.clone(), Arc::new(MemoryStore::new()));

    handle.search("").unwrap();
    handle.search("   ").unwrap();
    handle.search(" maps ").unwrap();
    settled(&handle, 3).await;

    let mut terms = client.terms();
    terms.sort();
    assert_eq!(terms, ["a", "a", "maps"]);
    stop(handle, task).await;
}

#[tokio::test]
async fn search_failure_keeps_previous_results() {
    let client = Arc::new(
        StubClient::default()
            .answer("a", vec![app(1, "App A"), app(2, "App B")])
            .fail("broken", "network error"),
    );
    let (handle, task) = start(SearchConfig::default(), client, Arc::new(MemoryStore::new()));

    handle.search("a").unwrap();
    let ok = settled(&handle, 1).await;
    assert_eq!(ok.last_error, None);
    assert_eq!(ok.results, vec![app(1, "App A"), app(2, "App B")]);

    handle.search("broken").unwrap();
    let failed = settled(&handle, 2).await;
    assert!(!failed.is_loading);
    assert_eq!(failed.results, ok.results);
    assert_eq!(failed.last_error.as_deref(), Some("network error"));

    stop(handle, task).await;
}

#[tokio::test]
async fn last_completion_wins_by_default() {
    let client = Arc::new(
        StubClient::default()
            .answer_after("slow", Duration::from_millis(100), vec![app(1, "Slow")])
            .answer("fast", vec![app(2, "Fast")]),
    );
    let (handle, task) = start(SearchConfig::default(), client, Arc::new(MemoryStore::new()));

    handle.search("slow").unwrap();
    handle.search("fast").unwrap();
    let state = settled(&handle, 2).await;

    assert_eq!(state.results, vec![app(1, "Slow")]);
    stop(handle, task).await;
}

#[tokio::test]
async fn stale_guard_keeps_the_newest_search() {
    let client = Arc::new(
        StubClient::default()
            .answer_after("slow", Duration::from_millis(100), vec![app(1, "Slow")])
            .answer("fast", vec![app(2, "Fast")]),
    );
    let config = SearchConfig {
        discard_stale_results: true,
        ..SearchConfig::default()
    };
    let (handle, task) = start(config, client, Arc::new(MemoryStore::new()));

    handle.search("slow").unwrap();
    handle.search("fast").unwrap();
    let state = settled(&handle, 2).await;

    assert_eq!(state.results, vec![app(2, "Fast")]);
    assert!(!state.is_loading);
    stop(handle, task).await;
}

#[tokio::test]
async fn stale_guard_drops_an_older_success_after_a_newer_failure() {
    let client = Arc::new(
        StubClient::default()
            .answer_after("slow", Duration::from_millis(100), vec![app(1, "Slow")])
            .fail("broken", "network error"),
    );
    let config = SearchConfig {
        discard_stale_results: true,
        ..SearchConfig::default()
    };
    let (handle, task) = start(config, client, Arc::new(MemoryStore::new()));

    handle.search("slow").unwrap();
    handle.search("broken").unwrap();
    let state = settled(&handle, 2).await;

    assert!(state.results.is_empty());
    assert_eq!(state.last_error.as_deref(), Some("network error"));
    stop(handle, task).await;
}

#[tokio::test]
async fn favorites_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let client = Arc::new(StubClient::default().answer("a", vec![app(1, "App A"), app(2, "App B")]));

    let (handle, task) = start(
        SearchConfig::default(),
        client.clone(),
        Arc::new(JsonFileStore::open(&path).unwrap()),
    );
    handle.search("a").unwrap();
    settled(&handle, 1).await;
    handle.toggle_favorite(2).unwrap();
    handle.toggle_favorite(1).unwrap();
    handle.toggle_favorite(2).unwrap();
    stop(handle, task).await;

    let (handle, task) = start(
        SearchConfig::default(),
        client,
        Arc::new(JsonFileStore::open(&path).unwrap()),
    );
    handle.hydrate().unwrap();
    let state = handle.wait_for(|s| s.hydrated).await.unwrap();

    assert_eq!(state.favorite_ids(), [1]);
    assert_eq!(state.favorite_entries()[0].name, "App A");
    assert!(state.results.is_empty());
    stop(handle, task).await;
}

#[tokio::test]
async fn toggles_after_hydration_extend_the_stored_favorites() {
    let store = Arc::new(MemoryStore::with_values([
        ("favorites", "[5]"),
        ("favoritesData", r#"[{"trackId": 5, "trackName": "Five"}]"#),
    ]));
    let client = Arc::new(StubClient::default().answer("a", vec![app(1, "One"), app(5, "Five")]));
    let (handle, task) = start(SearchConfig::default(), client, store.clone());

    handle.start_session().unwrap();
    handle
        .wait_for(|s| s.hydrated && s.search_generation >= 1 && s.pending_searches == 0)
        .await
        .unwrap();
    handle.toggle_favorite(1).unwrap();
    let state = handle.wait_for(|s| s.is_favorite(1)).await.unwrap();
    assert!(state.is_favorite(5));
    stop(handle, task).await;

    let stored = store.get("favorites").await.unwrap().unwrap();
    let mut stored: Vec<i64> = serde_json::from_str(&stored).unwrap();
    stored.sort_unstable();
    assert_eq!(stored, [1, 5]);
}

#[tokio::test]
async fn hydrating_an_empty_store_uses_defaults() {
    let (handle, task) = start(
        SearchConfig::default(),
        Arc::new(StubClient::default()),
        Arc::new(MemoryStore::new()),
    );

    let before = Utc::now();
    handle.hydrate().unwrap();
    let state = handle.wait_for(|s| s.hydrated).await.unwrap();

    assert!(state.favorite_ids().is_empty());
    assert!(state.favorite_entries().is_empty());
    assert!(state.last_visited_at >= before);
    stop(handle, task).await;
}

#[tokio::test]
async fn no_op_toggles_write_nothing() {
    let store = Arc::new(MemoryStore::new());
    let client = Arc::new(StubClient::default().answer("a", vec![app(1, "App A")]));
    let (handle, task) = start(SearchConfig::default(), client, store.clone());

    handle.search("a").unwrap();
    settled(&handle, 1).await;
    handle.toggle_favorite(99).unwrap();
    handle.toggle_view_mode().unwrap();
    let state = handle.wait_for(|s| s.view_mode == ViewMode::Grid).await.unwrap();
    assert!(state.favorite_ids().is_empty());

    stop(handle, task).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn subscribers_see_each_published_state() {
    let (handle, task) = start(
        SearchConfig::default(),
        Arc::new(StubClient::default()),
        Arc::new(MemoryStore::new()),
    );
    let mut updates = handle.subscribe();

    handle.toggle_view_mode().unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().view_mode, ViewMode::Grid);

    handle.toggle_view_mode().unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().view_mode, ViewMode::List);

    stop(handle, task).await;
}

#[tokio::test]
async fn intents_after_shutdown_are_rejected() {
    let (handle, task) = start(
        SearchConfig::default(),
        Arc::new(StubClient::default()),
        Arc::new(MemoryStore::new()),
    );
    let other = handle.clone();
    stop(handle, task).await;

    assert!(matches!(other.search("a"), Err(CatalogError::Runtime(_))));
    assert!(matches!(other.shutdown().await, Err(CatalogError::Runtime(_))));
    assert_eq!(other.snapshot().view_mode, ViewMode::List);
}
