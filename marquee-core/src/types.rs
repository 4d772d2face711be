//! Shared data types for catalog results and trending counters.

use serde::{Deserialize, Serialize};

/// Single movie entry as normalized from the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f32>,
    pub release_date: Option<String>,
    pub original_language: String,
}

impl MovieSummary {
    /// Absolute poster URL under the given image host, if the catalog
    /// provided a poster path.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("{image_base_url}{path}"))
    }

    /// Rating rendered with one decimal place, or "N/A" when unrated.
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(rating) => format!("{rating:.1}"),
            None => "N/A".to_string(),
        }
    }

    /// Release year extracted from the ISO release date, or "N/A".
    pub fn release_year(&self) -> String {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Persisted trending counter, one per recorded search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    /// Backing document id assigned by the store
    pub id: String,
    pub search_term: String,
    pub count: u64,
    pub movie_id: u64,
    pub poster_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(poster: Option<&str>, rating: Option<f32>, date: Option<&str>) -> MovieSummary {
        MovieSummary {
            id: 603,
            title: "The Matrix".to_string(),
            poster_path: poster.map(str::to_string),
            vote_average: rating,
            release_date: date.map(str::to_string),
            original_language: "en".to_string(),
        }
    }

    #[test]
    fn test_poster_url_joins_host_and_path() {
        let summary = movie(Some("/f89U3.jpg"), None, None);
        assert_eq!(
            summary.poster_url("https://image.tmdb.org/t/p/w500"),
            Some("https://image.tmdb.org/t/p/w500/f89U3.jpg".to_string())
        );
    }

    #[test]
    fn test_poster_url_missing_path() {
        let summary = movie(None, None, None);
        assert_eq!(summary.poster_url("https://image.tmdb.org/t/p/w500"), None);
    }

    #[test]
    fn test_rating_label_one_decimal() {
        assert_eq!(movie(None, Some(8.25), None).rating_label(), "8.2");
        assert_eq!(movie(None, Some(7.0), None).rating_label(), "7.0");
        assert_eq!(movie(None, None, None).rating_label(), "N/A");
    }

    #[test]
    fn test_release_year_from_iso_date() {
        assert_eq!(movie(None, None, Some("1999-03-31")).release_year(), "1999");
        assert_eq!(movie(None, None, None).release_year(), "N/A");
        assert_eq!(movie(None, None, Some("")).release_year(), "N/A");
    }
}
