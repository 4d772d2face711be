//! Trend counter storage for recorded searches.
//!
//! The store keeps one counter document per search term and serves the
//! trending list shown at startup. Recording is best-effort by contract: a
//! search result must never be delayed or failed because the counter store
//! is unreachable.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{MovieSummary, TrendEntry};

pub mod appwrite;
pub mod memory;

pub use appwrite::AppwriteTrendStore;
pub use memory::MemoryTrendStore;

/// Errors that can occur against the trend counter store.
#[derive(Debug, Error)]
pub enum TrendStoreError {
    /// Store answered with a non-success HTTP status.
    #[error("Trend store request failed with status {status}")]
    RequestFailed {
        /// HTTP status code returned by the store
        status: u16,
    },

    /// Network failure before the store answered.
    #[error("Trend store transport error: {reason}")]
    Transport {
        /// The reason for the transport failure
        reason: String,
    },

    /// Store answered with a body this client could not decode.
    #[error("Trend store returned an unreadable response: {reason}")]
    Decode {
        /// The reason decoding failed
        reason: String,
    },
}

/// Trait for trend counter stores.
///
/// The `try_` methods expose real errors for callers and tests that need
/// them. [`TrendStore::record_search`] and [`TrendStore::trending`] are the
/// best-effort surface the engine uses: failures are logged and swallowed.
#[async_trait]
pub trait TrendStore: Send + Sync + std::fmt::Debug {
    /// Records one search for `term`, creating its counter document on first
    /// sight or incrementing the existing count otherwise.
    ///
    /// The increment is a read-then-write without a concurrency check: two
    /// concurrent recorders for one term can lose an increment or create
    /// duplicate documents.
    ///
    /// # Errors
    /// - `TrendStoreError::RequestFailed` - Store returned a non-success status
    /// - `TrendStoreError::Transport` - Network failure
    /// - `TrendStoreError::Decode` - Response body could not be decoded
    async fn try_record_search(
        &self,
        term: &str,
        first_result: &MovieSummary,
    ) -> Result<(), TrendStoreError>;

    /// Returns up to `limit` counters ordered by count descending.
    ///
    /// # Errors
    /// - `TrendStoreError::RequestFailed` - Store returned a non-success status
    /// - `TrendStoreError::Transport` - Network failure
    /// - `TrendStoreError::Decode` - Response body could not be decoded
    async fn try_trending(&self, limit: usize) -> Result<Vec<TrendEntry>, TrendStoreError>;

    /// Best-effort variant of [`TrendStore::try_record_search`]: logs and
    /// swallows failures.
    async fn record_search(&self, term: &str, first_result: &MovieSummary) {
        if let Err(error) = self.try_record_search(term, first_result).await {
            tracing::warn!("Failed to record search for '{}': {}", term, error);
        }
    }

    /// Best-effort variant of [`TrendStore::try_trending`]: logs failures and
    /// returns an empty list.
    async fn trending(&self, limit: usize) -> Vec<TrendEntry> {
        match self.try_trending(limit).await {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!("Failed to load trending searches: {}", error);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct UnreachableStore;

    #[async_trait]
    impl TrendStore for UnreachableStore {
        async fn try_record_search(
            &self,
            _term: &str,
            _first_result: &MovieSummary,
        ) -> Result<(), TrendStoreError> {
            Err(TrendStoreError::Transport {
                reason: "connection refused".to_string(),
            })
        }

        async fn try_trending(&self, _limit: usize) -> Result<Vec<TrendEntry>, TrendStoreError> {
            Err(TrendStoreError::RequestFailed { status: 503 })
        }
    }

    fn sample_movie() -> MovieSummary {
        MovieSummary {
            id: 603,
            title: "The Matrix".to_string(),
            poster_path: Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg".to_string()),
            vote_average: Some(8.2),
            release_date: Some("1999-03-31".to_string()),
            original_language: "en".to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_search_swallows_store_failures() {
        let store = UnreachableStore;
        // Must not panic or propagate anything.
        store.record_search("matrix", &sample_movie()).await;
    }

    #[tokio::test]
    async fn test_trending_falls_back_to_empty_list() {
        let store = UnreachableStore;
        assert!(store.trending(5).await.is_empty());
    }
}
