//! Marquee Core - Essential movie search and trending functionality
//!
//! This crate provides the fundamental building blocks for the Marquee movie
//! discovery flow: the debounced search engine actor, movie catalog clients,
//! trend counter storage, and configuration management.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod mode;
pub mod tracing_setup;
pub mod trending;
pub mod types;

// Flat re-exports so callers rarely need the module paths
pub use catalog::{CatalogError, CatalogProvider, DemoCatalog, TmdbCatalog};
pub use config::MarqueeConfig;
pub use engine::{SearchHandle, UiState, spawn_search_engine};
pub use mode::RuntimeMode;
pub use trending::{AppwriteTrendStore, MemoryTrendStore, TrendStore, TrendStoreError};
pub use types::{MovieSummary, TrendEntry};

/// Top-level error for everything that can fail across Marquee subsystems.
///
/// Component errors convert in via `#[from]`; the CLI matches on this one
/// type and renders [`MarqueeError::user_message`] to the terminal.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Trend store error: {0}")]
    TrendStore(#[from] TrendStoreError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Search engine is shut down")]
    EngineShutdown,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarqueeError {
    /// Message fit for the terminal, with internals stripped.
    pub fn user_message(&self) -> String {
        match self {
            MarqueeError::Catalog(e) => e.user_message(),
            MarqueeError::TrendStore(_) => "Trending searches are unavailable".to_string(),
            MarqueeError::Configuration { reason } => format!("Configuration error: {reason}"),
            MarqueeError::EngineShutdown => "Search engine is shut down".to_string(),
            MarqueeError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// True when the failure lies in the operator's input or setup rather
    /// than in a runtime fault.
    pub fn is_user_error(&self) -> bool {
        matches!(self, MarqueeError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, MarqueeError>;
