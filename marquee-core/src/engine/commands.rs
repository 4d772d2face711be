//! Command definitions for the search engine actor.

use tokio::sync::oneshot;

use crate::catalog::CatalogError;
use crate::types::{MovieSummary, TrendEntry};

/// Commands processed by the search engine actor.
///
/// Handle-initiated commands carry a response channel. Fetch and trending
/// completions arrive over the internal event channel without one; they are
/// fired by tasks the engine itself spawned.
pub enum SearchCommand {
    /// Updates the raw query text and restarts the debounce timer.
    SetQuery {
        /// New query text, used exactly as typed
        query: String,
        /// Acknowledgement channel
        responder: oneshot::Sender<()>,
    },

    /// Reads a snapshot of the current UI state.
    Snapshot {
        /// Channel receiving the state clone
        responder: oneshot::Sender<UiState>,
    },

    /// Shuts down the engine actor gracefully.
    Shutdown {
        /// Acknowledgement channel
        responder: oneshot::Sender<()>,
    },

    /// Internal notification that a spawned catalog fetch finished.
    FetchCompleted {
        /// Sequence number assigned when the fetch was issued
        seq: u64,
        /// Query the fetch served
        query: String,
        /// Catalog result or error
        outcome: Result<Vec<MovieSummary>, CatalogError>,
    },

    /// Internal notification that the startup trending load finished.
    TrendingLoaded {
        /// Counters ordered by count descending
        entries: Vec<TrendEntry>,
    },
}

/// Read-only view of the search engine state for a presentation surface.
///
/// `raw_query` tracks every edit as it happens. `debounced_query` is the last
/// value committed after the quiet period, and is what `loading`, `error`,
/// and `results` describe. `trending` is loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Query text as currently typed
    pub raw_query: String,
    /// Last query committed by the debounce timer
    pub debounced_query: String,
    /// True while a fetch for `debounced_query` is outstanding
    pub loading: bool,
    /// User-facing message from the most recent failed fetch
    pub error: Option<String>,
    /// Results of the most recent applied fetch
    pub results: Vec<MovieSummary>,
    /// Most-searched terms, highest count first
    pub trending: Vec<TrendEntry>,
}
