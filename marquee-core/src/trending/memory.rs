//! In-memory trend store for development and tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{TrendStore, TrendStoreError};
use crate::config::CatalogConfig;
use crate::types::{MovieSummary, TrendEntry};

/// In-memory trend counter store.
///
/// Mirrors the document-store contract (filter by term, create, increment,
/// top-N by count) against a vector behind a lock. Clones share the same
/// underlying store, so a test can keep one clone for assertions after
/// handing the other to the engine.
#[derive(Debug, Clone)]
pub struct MemoryTrendStore {
    inner: Arc<RwLock<StoreInner>>,
    image_base_url: String,
}

#[derive(Debug, Default)]
struct StoreInner {
    entries: Vec<TrendEntry>,
    next_id: u64,
}

impl MemoryTrendStore {
    /// Creates an empty store using the default poster host.
    pub fn new() -> Self {
        Self::with_image_base(CatalogConfig::default().image_base_url)
    }

    /// Creates an empty store deriving poster URLs from the given host prefix.
    pub fn with_image_base(image_base_url: String) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
            image_base_url,
        }
    }

    /// Number of counter documents currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Returns true when no search has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all stored counters, in insertion order.
    pub fn entries(&self) -> Vec<TrendEntry> {
        self.inner.read().entries.clone()
    }
}

impl Default for MemoryTrendStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrendStore for MemoryTrendStore {
    async fn try_record_search(
        &self,
        term: &str,
        first_result: &MovieSummary,
    ) -> Result<(), TrendStoreError> {
        let mut inner = self.inner.write();

        if let Some(entry) = inner.entries.iter_mut().find(|e| e.search_term == term) {
            entry.count += 1;
            return Ok(());
        }

        inner.next_id += 1;
        let entry = TrendEntry {
            id: format!("mem-{}", inner.next_id),
            search_term: term.to_string(),
            count: 1,
            movie_id: first_result.id,
            poster_url: first_result
                .poster_url(&self.image_base_url)
                .unwrap_or_default(),
        };
        inner.entries.push(entry);
        Ok(())
    }

    async fn try_trending(&self, limit: usize) -> Result<Vec<TrendEntry>, TrendStoreError> {
        let mut entries = self.inner.read().entries.clone();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str, poster_path: Option<&str>) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: poster_path.map(ToString::to_string),
            vote_average: Some(7.0),
            release_date: Some("2020-01-01".to_string()),
            original_language: "en".to_string(),
        }
    }

    async fn record_times(store: &MemoryTrendStore, term: &str, times: u64) {
        for _ in 0..times {
            store
                .try_record_search(term, &movie(603, "The Matrix", Some("/m.jpg")))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_repeat_search_increments_single_document() {
        let store = MemoryTrendStore::new();

        record_times(&store, "matrix", 2).await;

        assert_eq!(store.len(), 1);
        let entries = store.entries();
        assert_eq!(entries[0].search_term, "matrix");
        assert_eq!(entries[0].count, 2);
    }

    #[tokio::test]
    async fn test_trending_orders_by_count_and_caps_at_limit() {
        let store = MemoryTrendStore::new();
        for (term, times) in [("a", 3), ("b", 9), ("c", 1), ("d", 7), ("e", 2), ("f", 5)] {
            record_times(&store, term, times).await;
        }

        let top = store.try_trending(5).await.unwrap();
        let terms: Vec<&str> = top.iter().map(|e| e.search_term.as_str()).collect();

        assert_eq!(terms, vec!["b", "d", "f", "a", "e"]);
        assert_eq!(top[0].count, 9);
    }

    #[tokio::test]
    async fn test_poster_url_joins_host_and_path() {
        let store = MemoryTrendStore::with_image_base("https://img.example/w500".to_string());
        store
            .try_record_search("matrix", &movie(603, "The Matrix", Some("/m.jpg")))
            .await
            .unwrap();

        assert_eq!(store.entries()[0].poster_url, "https://img.example/w500/m.jpg");
    }

    #[tokio::test]
    async fn test_posterless_first_result_stores_empty_url() {
        let store = MemoryTrendStore::new();
        store
            .try_record_search("reel", &movie(42, "Midnight Reel", None))
            .await
            .unwrap();

        assert_eq!(store.entries()[0].poster_url, "");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryTrendStore::new();
        let observer = store.clone();

        record_times(&store, "dune", 1).await;

        assert_eq!(observer.len(), 1);
    }
}
