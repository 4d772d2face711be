//! Actor implementation for the search engine.

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::commands::SearchCommand;
use super::core::SearchEngine;
use super::handle::SearchHandle;
use crate::catalog::CatalogProvider;
use crate::config::MarqueeConfig;
use crate::trending::TrendStore;

/// Spawns the search engine actor and returns its handle.
///
/// The engine runs on its own task and processes commands one at a time, so
/// UI state is only ever touched from that task. Startup mirrors a fresh
/// page load: the empty query is fetched immediately and the trending list
/// is loaded once.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() {
/// use marquee_core::catalog::DemoCatalog;
/// use marquee_core::config::MarqueeConfig;
/// use marquee_core::engine::spawn_search_engine;
/// use marquee_core::trending::MemoryTrendStore;
///
/// let config = MarqueeConfig::default();
/// let handle = spawn_search_engine(config, DemoCatalog::new(), MemoryTrendStore::new());
/// # }
/// ```
pub fn spawn_search_engine<C, S>(config: MarqueeConfig, catalog: C, trend_store: S) -> SearchHandle
where
    C: CatalogProvider + 'static,
    S: TrendStore + 'static,
{
    let (sender, receiver) = mpsc::channel(100);
    let (event_sender, event_receiver) = mpsc::unbounded_channel();
    let engine = SearchEngine::new(config, catalog, trend_store, event_sender);

    tokio::spawn(async move {
        run_actor_loop(engine, receiver, event_receiver).await;
    });

    SearchHandle::new(sender)
}

/// Drains handle commands and internal completion events until shutdown.
///
/// The loop owns the single debounce deadline: every query edit rearms it,
/// and when it elapses the pending text is committed and fetched.
async fn run_actor_loop<C, S>(
    mut engine: SearchEngine<C, S>,
    mut receiver: mpsc::Receiver<SearchCommand>,
    mut event_receiver: mpsc::UnboundedReceiver<SearchCommand>,
) where
    C: CatalogProvider + 'static,
    S: TrendStore + 'static,
{
    tracing::debug!("Search engine actor started");

    engine.start();
    let mut debounce_deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            Some(command) = receiver.recv() => {
                if !handle_command(&mut engine, &mut debounce_deadline, command) {
                    break;
                }
            }
            Some(command) = event_receiver.recv() => {
                if !handle_command(&mut engine, &mut debounce_deadline, command) {
                    break;
                }
            }
            // A disabled branch still evaluates its expression, so the
            // deadline needs a stand-in value while it is unarmed.
            _ = tokio::time::sleep_until(debounce_deadline.unwrap_or_else(Instant::now)),
                if debounce_deadline.is_some() =>
            {
                debounce_deadline = None;
                engine.commit_debounced();
            }
            else => break,
        }
    }

    tracing::debug!("Search engine actor stopped");
}

/// Applies one command to the engine.
/// Returns false when the command asks the loop to stop.
fn handle_command<C, S>(
    engine: &mut SearchEngine<C, S>,
    debounce_deadline: &mut Option<Instant>,
    command: SearchCommand,
) -> bool
where
    C: CatalogProvider + 'static,
    S: TrendStore + 'static,
{
    match command {
        SearchCommand::SetQuery { query, responder } => {
            engine.set_query(query);
            *debounce_deadline = Some(Instant::now() + engine.debounce());
            let _ = responder.send(());
        }

        SearchCommand::Snapshot { responder } => {
            let _ = responder.send(engine.snapshot());
        }

        SearchCommand::Shutdown { responder } => {
            tracing::debug!("Search engine actor shutting down");
            let _ = responder.send(());
            return false; // Stops the actor loop
        }

        SearchCommand::FetchCompleted {
            seq,
            query,
            outcome,
        } => {
            engine.apply_fetch(seq, query, outcome);
        }

        SearchCommand::TrendingLoaded { entries } => {
            engine.apply_trending(entries);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use super::super::commands::UiState;
    use crate::MarqueeError;
    use crate::catalog::{CatalogError, MockCatalog};
    use crate::trending::{MemoryTrendStore, TrendStore};
    use crate::types::MovieSummary;

    fn movie(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/poster-{id}.jpg")),
            vote_average: Some(7.5),
            release_date: Some("2020-01-01".to_string()),
            original_language: "en".to_string(),
        }
    }

    /// Polls until the given query has been committed and its fetch applied.
    async fn settled_state(handle: &SearchHandle, debounced: &str) -> UiState {
        for _ in 0..200 {
            let state = handle.snapshot().await.unwrap();
            if state.debounced_query == debounced && !state.loading {
                return state;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("engine never settled for query '{debounced}'");
    }

    #[tokio::test(start_paused = true)]
    async fn test_actor_fetches_popular_movies_at_startup() {
        let catalog = MockCatalog::new();
        catalog.push_results(vec![movie(1, "Popular One"), movie(2, "Popular Two")]);
        let handle = spawn_search_engine(
            MarqueeConfig::for_testing(),
            catalog.clone(),
            MemoryTrendStore::new(),
        );

        assert!(handle.is_running());

        let state = settled_state(&handle, "").await;
        assert_eq!(state.raw_query, "");
        assert_eq!(state.error, None);
        assert_eq!(state.results.len(), 2);
        assert_eq!(catalog.calls(), vec![String::new()]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_coalesce_into_one_fetch() {
        let catalog = MockCatalog::new();
        catalog.push_results(Vec::new()); // startup popularity listing
        catalog.push_results(vec![movie(603, "The Matrix")]);
        let handle = spawn_search_engine(
            MarqueeConfig::for_testing(),
            catalog.clone(),
            MemoryTrendStore::new(),
        );

        handle.set_query("m").await.unwrap();
        handle.set_query("ma").await.unwrap();
        handle.set_query("mat").await.unwrap();

        let state = settled_state(&handle, "mat").await;
        assert_eq!(state.results.len(), 1);
        assert_eq!(
            catalog.calls(),
            vec![String::new(), "mat".to_string()],
            "only the last edit of the burst should reach the catalog"
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_search_is_recorded_once() {
        let catalog = MockCatalog::new();
        catalog.push_results(Vec::new());
        catalog.push_results(vec![movie(603, "The Matrix"), movie(604, "Reloaded")]);
        let trend_store = MemoryTrendStore::new();
        let handle = spawn_search_engine(
            MarqueeConfig::for_testing(),
            catalog,
            trend_store.clone(),
        );

        handle.set_query("matrix").await.unwrap();
        let state = settled_state(&handle, "matrix").await;
        assert_eq!(state.error, None);

        // Recording runs detached from the fetch; give it a beat.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let entries = trend_store.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].search_term, "matrix");
        assert_eq!(entries[0].count, 1);
        assert_eq!(entries[0].movie_id, 603);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_startup_listing_is_never_recorded() {
        let catalog = MockCatalog::new();
        catalog.push_results(vec![movie(1, "Popular")]);
        let trend_store = MemoryTrendStore::new();
        let handle = spawn_search_engine(
            MarqueeConfig::for_testing(),
            catalog,
            trend_store.clone(),
        );

        settled_state(&handle, "").await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(trend_store.is_empty());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_failure_surfaces_fixed_message() {
        let catalog = MockCatalog::new();
        catalog.push_results(Vec::new());
        catalog.push_error(CatalogError::RequestFailed { status: 500 });
        let trend_store = MemoryTrendStore::new();
        let handle = spawn_search_engine(
            MarqueeConfig::for_testing(),
            catalog,
            trend_store.clone(),
        );

        handle.set_query("broken").await.unwrap();
        let state = settled_state(&handle, "broken").await;

        assert_eq!(state.error.as_deref(), Some("Failed to fetch movies"));
        assert!(state.results.is_empty());
        assert!(trend_store.is_empty());

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_body_rejection_surfaces_verbatim_message() {
        let catalog = MockCatalog::new();
        catalog.push_results(Vec::new());
        catalog.push_error(CatalogError::Rejected {
            message: "Invalid API key: You must be granted a valid key.".to_string(),
        });
        let handle = spawn_search_engine(
            MarqueeConfig::for_testing(),
            catalog,
            MemoryTrendStore::new(),
        );

        handle.set_query("matrix").await.unwrap();
        let state = settled_state(&handle, "matrix").await;

        assert_eq!(
            state.error.as_deref(),
            Some("Invalid API key: You must be granted a valid key.")
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_surfaces_generic_message() {
        let catalog = MockCatalog::new();
        catalog.push_results(Vec::new());
        catalog.push_error(CatalogError::Transport {
            reason: "connection refused".to_string(),
        });
        let handle = spawn_search_engine(
            MarqueeConfig::for_testing(),
            catalog,
            MemoryTrendStore::new(),
        );

        handle.set_query("matrix").await.unwrap();
        let state = settled_state(&handle, "matrix").await;

        assert_eq!(
            state.error.as_deref(),
            Some("Error fetching movies. Please try again later.")
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_trending_list_loads_at_startup() {
        let trend_store = MemoryTrendStore::new();
        for (term, times) in [("movies", 9), ("rust", 4)] {
            for _ in 0..times {
                trend_store
                    .try_record_search(term, &movie(10, "Seed"))
                    .await
                    .unwrap();
            }
        }

        let catalog = MockCatalog::new();
        let handle = spawn_search_engine(MarqueeConfig::for_testing(), catalog, trend_store);

        let mut trending = Vec::new();
        for _ in 0..200 {
            trending = handle.snapshot().await.unwrap().trending;
            if !trending.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let terms: Vec<&str> = trending.iter().map(|e| e.search_term.as_str()).collect();
        assert_eq!(terms, vec!["movies", "rust"]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_operations_fail_after_shutdown() {
        let handle = spawn_search_engine(
            MarqueeConfig::for_testing(),
            MockCatalog::new(),
            MemoryTrendStore::new(),
        );

        handle.shutdown().await.unwrap();

        // The ack fires just before the loop exits; let it finish.
        tokio::time::sleep(Duration::from_millis(10)).await;

        let result = handle.snapshot().await;
        assert!(matches!(result, Err(MarqueeError::EngineShutdown)));
        let result = handle.set_query("late").await;
        assert!(matches!(result, Err(MarqueeError::EngineShutdown)));
        assert!(!handle.is_running());
    }
}
