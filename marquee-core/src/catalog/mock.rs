//! Mock catalog provider for testing.

#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use parking_lot::Mutex;

#[cfg(test)]
use super::{CatalogError, CatalogProvider};
#[cfg(test)]
use crate::types::MovieSummary;

/// Scripted catalog for engine tests.
///
/// Pops queued responses in order and records every query it receives.
/// Clones share the same queue and call log, so a test can keep one clone
/// for assertions after handing the other to the engine. An exhausted queue
/// yields empty result lists.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    responses: Arc<Mutex<VecDeque<Result<Vec<MovieSummary>, CatalogError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn push_results(&self, results: Vec<MovieSummary>) {
        self.responses.lock().push_back(Ok(results));
    }

    /// Queues an error response.
    pub fn push_error(&self, error: CatalogError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Queries received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl CatalogProvider for MockCatalog {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        self.calls.lock().push(query.to_string());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
