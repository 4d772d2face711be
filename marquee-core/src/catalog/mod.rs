//! Provider implementations for movie catalog search.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::MovieSummary;

pub mod demo;
pub mod mock;
pub mod tmdb;

pub use demo::DemoCatalog;
#[cfg(test)]
pub use mock::MockCatalog;
pub use tmdb::TmdbCatalog;

/// Errors that can occur while fetching from the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog answered with a non-success HTTP status.
    #[error("Failed to fetch movies")]
    RequestFailed {
        /// HTTP status code returned by the catalog
        status: u16,
    },

    /// Catalog answered 2xx but flagged the request as failed in the body.
    #[error("{message}")]
    Rejected {
        /// Error message taken from the response body
        message: String,
    },

    /// Network or body-decoding failure before the catalog gave a verdict.
    #[error("Catalog transport error: {reason}")]
    Transport {
        /// The reason for the transport failure
        reason: String,
    },
}

impl CatalogError {
    /// Message shown in the results pane in place of a movie list.
    ///
    /// Status-level failures and body rejections surface their fixed or
    /// verbatim message; transport failures collapse to one generic line so
    /// network internals never reach the user.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::RequestFailed { .. } => "Failed to fetch movies".to_string(),
            CatalogError::Rejected { message } => message.clone(),
            CatalogError::Transport { .. } => {
                "Error fetching movies. Please try again later.".to_string()
            }
        }
    }
}

/// Trait for movie catalog providers.
///
/// Implementations provide movie search functionality through different
/// backends (the real catalog API, built-in development data, mock providers
/// for testing).
#[async_trait]
pub trait CatalogProvider: Send + Sync + std::fmt::Debug {
    /// Fetch movies for the given query.
    ///
    /// An empty query requests the discovery listing ordered by descending
    /// popularity; a non-empty query runs a text search. The query is used
    /// as typed: no trimming or case normalization is applied.
    ///
    /// # Errors
    /// - `CatalogError::RequestFailed` - Catalog returned a non-success status
    /// - `CatalogError::Rejected` - Catalog flagged the request as failed in the body
    /// - `CatalogError::Transport` - Network or response decoding failure
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_displays_fixed_message() {
        let error = CatalogError::RequestFailed { status: 500 };
        assert_eq!(error.to_string(), "Failed to fetch movies");
        assert_eq!(error.user_message(), "Failed to fetch movies");
    }

    #[test]
    fn test_rejected_surfaces_body_message_verbatim() {
        let error = CatalogError::Rejected {
            message: "Invalid API key: You must be granted a valid key.".to_string(),
        };
        assert_eq!(
            error.user_message(),
            "Invalid API key: You must be granted a valid key."
        );
    }

    #[test]
    fn test_transport_collapses_to_generic_message() {
        let error = CatalogError::Transport {
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            error.user_message(),
            "Error fetching movies. Please try again later."
        );
        // The internal reason stays available for logs.
        assert!(error.to_string().contains("connection refused"));
    }
}
