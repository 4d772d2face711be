//! TMDB movie catalog client for production use.

use async_trait::async_trait;
use serde::Deserialize;

use super::{CatalogError, CatalogProvider};
use crate::config::CatalogConfig;
use crate::types::MovieSummary;

/// TMDB catalog client for real movie data.
///
/// Talks to the TMDB v3 REST API over its two read-only listing endpoints:
/// text search and popularity-ordered discovery. Every request carries the
/// configured bearer credential; the client never refreshes or validates it.
#[derive(Debug)]
pub struct TmdbCatalog {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

/// Response page from the TMDB search and discover endpoints.
///
/// Application-level failure can arrive inside a 2xx body as a
/// `Response: "False"` flag with an `Error` message alongside.
#[derive(Debug, Deserialize)]
struct TmdbPage {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
    results: Option<Vec<TmdbMovie>>,
}

/// Single movie record within a response page.
#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    title: String,
    poster_path: Option<String>,
    vote_average: Option<f32>,
    release_date: Option<String>,
    #[serde(default)]
    original_language: String,
}

impl TmdbCatalog {
    /// Creates a TMDB catalog client from catalog configuration.
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
            api_token: config.api_token,
        }
    }

    /// Endpoint selection: an empty query browses by popularity, anything
    /// else runs a text search with the query URL-escaped.
    fn endpoint_for(&self, query: &str) -> String {
        if query.is_empty() {
            format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
        } else {
            format!(
                "{}/search/movie?query={}",
                self.base_url,
                urlencoding::encode(query)
            )
        }
    }

    fn into_summary(movie: TmdbMovie) -> MovieSummary {
        MovieSummary {
            id: movie.id,
            title: movie.title,
            poster_path: movie.poster_path,
            vote_average: movie.vote_average,
            release_date: movie.release_date,
            original_language: movie.original_language,
        }
    }
}

#[async_trait]
impl CatalogProvider for TmdbCatalog {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        let url = self.endpoint_for(query);
        tracing::debug!("Fetching movies from {}", url);

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(ref token) = self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Transport {
                reason: format!("Catalog request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(CatalogError::RequestFailed {
                status: response.status().as_u16(),
            });
        }

        let page: TmdbPage = response.json().await.map_err(|e| CatalogError::Transport {
            reason: format!("Catalog JSON parsing failed: {e}"),
        })?;

        if page.response.as_deref() == Some("False") {
            return Err(CatalogError::Rejected {
                message: page
                    .error
                    .unwrap_or_else(|| "Failed to fetch movies".to_string()),
            });
        }

        Ok(page
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Self::into_summary)
            .collect())
    }
}
