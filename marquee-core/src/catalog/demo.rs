//! Demo catalog with built-in movie data for development.

use async_trait::async_trait;

use super::{CatalogError, CatalogProvider};
use crate::types::MovieSummary;

/// Demo catalog backed by a fixed set of well-known movies.
///
/// Returns deterministic results without network access, so the engine and
/// CLI can be exercised offline. An empty query lists everything by
/// popularity; a non-empty query does a case-insensitive substring match on
/// the title.
#[derive(Debug)]
pub struct DemoCatalog {
    movies: Vec<DemoMovie>,
}

#[derive(Debug, Clone)]
struct DemoMovie {
    popularity: f32,
    summary: MovieSummary,
}

impl DemoCatalog {
    /// Creates a demo catalog with the built-in movie set.
    pub fn new() -> Self {
        let mut movies = builtin_movies();
        movies.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        Self { movies }
    }
}

impl Default for DemoCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogProvider for DemoCatalog {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        if query.is_empty() {
            return Ok(self.movies.iter().map(|m| m.summary.clone()).collect());
        }

        let needle = query.to_lowercase();
        Ok(self
            .movies
            .iter()
            .filter(|m| m.summary.title.to_lowercase().contains(&needle))
            .map(|m| m.summary.clone())
            .collect())
    }
}

fn movie(
    popularity: f32,
    id: u64,
    title: &str,
    poster_path: Option<&str>,
    vote_average: f32,
    release_date: &str,
    original_language: &str,
) -> DemoMovie {
    DemoMovie {
        popularity,
        summary: MovieSummary {
            id,
            title: title.to_string(),
            poster_path: poster_path.map(ToString::to_string),
            vote_average: Some(vote_average),
            release_date: Some(release_date.to_string()),
            original_language: original_language.to_string(),
        },
    }
}

fn builtin_movies() -> Vec<DemoMovie> {
    vec![
        movie(
            94.3,
            603,
            "The Matrix",
            Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"),
            8.2,
            "1999-03-31",
            "en",
        ),
        movie(
            140.2,
            27205,
            "Inception",
            Some("/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg"),
            8.4,
            "2010-07-15",
            "en",
        ),
        movie(
            163.9,
            157336,
            "Interstellar",
            Some("/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg"),
            8.4,
            "2014-11-05",
            "en",
        ),
        movie(
            88.1,
            155,
            "The Dark Knight",
            Some("/qJ2tW6WMUDux911r6m7haRef0WH.jpg"),
            8.5,
            "2008-07-16",
            "en",
        ),
        movie(
            121.7,
            438631,
            "Dune",
            Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"),
            7.8,
            "2021-09-15",
            "en",
        ),
        movie(
            64.5,
            335984,
            "Blade Runner 2049",
            Some("/gajva2L0rPYkEWjzgFlBXCAVBE5.jpg"),
            7.5,
            "2017-10-04",
            "en",
        ),
        movie(
            77.8,
            496243,
            "Parasite",
            Some("/7IiTTgloJzvGI1TAYymCfbfl3vT.jpg"),
            8.5,
            "2019-05-30",
            "ko",
        ),
        movie(
            90.6,
            129,
            "Spirited Away",
            Some("/39wmItIWsg5sZMyRUHLkWBcuVCM.jpg"),
            8.5,
            "2001-07-20",
            "ja",
        ),
        movie(
            55.2,
            670,
            "Oldboy",
            Some("/pWDtjs568ZfOTMbURQBYuT4Qxka.jpg"),
            8.3,
            "2003-11-21",
            "ko",
        ),
        // No poster on purpose, to exercise placeholder rendering.
        movie(30.4, 42_000_001, "Midnight Reel", None, 6.1, "2024-02-09", "en"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_query_lists_by_popularity() {
        let catalog = DemoCatalog::new();
        let movies = catalog.fetch_movies("").await.unwrap();

        assert_eq!(movies.len(), 10);
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles[..3], ["Interstellar", "Inception", "Dune"]);
    }

    #[tokio::test]
    async fn test_search_matches_substring_case_insensitive() {
        let catalog = DemoCatalog::new();

        let movies = catalog.fetch_movies("MATRIX").await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, 603);

        let movies = catalog.fetch_movies("dark").await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "The Dark Knight");
    }

    #[tokio::test]
    async fn test_search_without_match_is_empty() {
        let catalog = DemoCatalog::new();
        let movies = catalog.fetch_movies("zz-no-such-movie").await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_builtin_set_includes_posterless_entry() {
        let catalog = DemoCatalog::new();
        let movies = catalog.fetch_movies("Midnight Reel").await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].poster_path, None);
    }
}
