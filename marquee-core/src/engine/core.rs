//! Core search engine implementation for the actor model.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::commands::{SearchCommand, UiState};
use crate::catalog::{CatalogError, CatalogProvider};
use crate::config::MarqueeConfig;
use crate::trending::TrendStore;
use crate::types::{MovieSummary, TrendEntry};

/// Core search engine implementation.
///
/// Owns the UI state and runs inside the actor task; nothing else ever
/// mutates the state. Network calls are spawned as separate tasks that
/// report back over the internal event channel, so slow backends never
/// block command processing.
pub struct SearchEngine<C: CatalogProvider, S: TrendStore> {
    /// Movie catalog backend
    catalog: Arc<C>,
    /// Trend counter store
    trend_store: Arc<S>,
    /// Configuration
    config: MarqueeConfig,
    /// UI state served to handles
    state: UiState,
    /// Sequence number of the most recently issued fetch
    latest_seq: u64,
    /// Sender for fetch and trending completion events
    event_sender: mpsc::UnboundedSender<SearchCommand>,
}

impl<C, S> SearchEngine<C, S>
where
    C: CatalogProvider + 'static,
    S: TrendStore + 'static,
{
    /// Creates a new search engine with the provided backends.
    pub fn new(
        config: MarqueeConfig,
        catalog: C,
        trend_store: S,
        event_sender: mpsc::UnboundedSender<SearchCommand>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            trend_store: Arc::new(trend_store),
            config,
            state: UiState::default(),
            latest_seq: 0,
            event_sender,
        }
    }

    /// Quiet period after the last query edit before a fetch is committed.
    pub fn debounce(&self) -> Duration {
        self.config.search.debounce
    }

    /// Mirrors a fresh page load: fetches the initial empty query (the
    /// popularity listing) and starts the one-time trending load.
    pub fn start(&mut self) {
        self.begin_fetch(String::new());
        self.load_trending();
    }

    /// Updates the raw query text.
    ///
    /// The actor loop owns the debounce timer; nothing is fetched until the
    /// value is committed.
    pub fn set_query(&mut self, query: String) {
        self.state.raw_query = query;
    }

    /// Commits the current raw query as the debounced query.
    ///
    /// A deadline can fire for text matching the already-committed query (an
    /// edit burst that returned to its starting value); nothing is fetched
    /// unless the committed value actually changed.
    pub fn commit_debounced(&mut self) {
        if self.state.raw_query == self.state.debounced_query {
            return;
        }
        let query = self.state.raw_query.clone();
        self.begin_fetch(query);
    }

    /// Starts a catalog fetch for `query`.
    ///
    /// Marks the state loading, stamps the fetch with a fresh sequence
    /// number, and spawns the network call. Only the newest sequence is ever
    /// applied, so a slow earlier response cannot overwrite a fresher one.
    fn begin_fetch(&mut self, query: String) {
        self.state.debounced_query = query.clone();
        self.state.loading = true;
        self.state.error = None;

        self.latest_seq += 1;
        let seq = self.latest_seq;

        let catalog = Arc::clone(&self.catalog);
        let events = self.event_sender.clone();
        tokio::spawn(async move {
            let outcome = catalog.fetch_movies(&query).await;
            let _ = events.send(SearchCommand::FetchCompleted {
                seq,
                query,
                outcome,
            });
        });
    }

    /// Applies a finished fetch to the UI state.
    ///
    /// Completions carrying a stale sequence number are dropped. A
    /// successful non-empty search dispatches a detached trend-recording
    /// task; the result display never waits on it.
    pub fn apply_fetch(
        &mut self,
        seq: u64,
        query: String,
        outcome: Result<Vec<MovieSummary>, CatalogError>,
    ) {
        if seq != self.latest_seq {
            tracing::debug!(
                "Dropping stale fetch completion for '{}' (seq {}, latest {})",
                query,
                seq,
                self.latest_seq
            );
            return;
        }

        match outcome {
            Ok(results) => {
                self.state.results = results;
                self.state.loading = false;

                if !query.is_empty()
                    && let Some(first) = self.state.results.first()
                {
                    self.record_search(query, first.clone());
                }
            }
            Err(error) => {
                tracing::warn!("Catalog fetch for '{}' failed: {}", query, error);
                self.state.results = Vec::new();
                self.state.error = Some(error.user_message());
                self.state.loading = false;
            }
        }
    }

    /// Applies a finished trending load to the UI state.
    pub fn apply_trending(&mut self, entries: Vec<TrendEntry>) {
        self.state.trending = entries;
    }

    /// Returns a snapshot of the current UI state.
    pub fn snapshot(&self) -> UiState {
        self.state.clone()
    }

    /// Dispatches a detached task recording one search against the trend
    /// store. Store failures are logged there and never reach the UI state.
    fn record_search(&self, term: String, first_result: MovieSummary) {
        let store = Arc::clone(&self.trend_store);
        tokio::spawn(async move {
            store.record_search(&term, &first_result).await;
        });
    }

    /// Starts the one-time trending load.
    fn load_trending(&self) {
        let store = Arc::clone(&self.trend_store);
        let limit = self.config.search.trending_limit;
        let events = self.event_sender.clone();
        tokio::spawn(async move {
            let entries = store.trending(limit).await;
            let _ = events.send(SearchCommand::TrendingLoaded { entries });
        });
    }
}
