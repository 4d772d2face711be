//! Centralized configuration for Marquee.
//!
//! All endpoints, credentials, and tunable behavior are defined here to
//! avoid hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all Marquee components.
///
/// Groups related settings into logical sections and supports environment
/// variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MarqueeConfig {
    /// Movie catalog API settings
    pub catalog: CatalogConfig,
    /// Trending counter store settings
    pub trend_store: TrendStoreConfig,
    /// Search engine behavior settings
    pub search: SearchConfig,
}

/// Movie catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog REST API
    pub base_url: String,
    /// Bearer token sent with every catalog request
    pub api_token: Option<String>,
    /// Host prefix for poster image paths
    pub image_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_token: None,
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
        }
    }
}

/// Document store configuration for trending counters.
#[derive(Debug, Clone)]
pub struct TrendStoreConfig {
    /// Document store API endpoint
    pub endpoint: String,
    /// Project identifier sent with every request
    pub project_id: String,
    /// Server API key; optional because browser-style setups omit it
    pub api_key: Option<String>,
    /// Database holding the trending collection
    pub database_id: String,
    /// Collection holding one counter document per search term
    pub collection_id: String,
}

impl Default for TrendStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nyc.cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            api_key: None,
            database_id: String::new(),
            collection_id: String::new(),
        }
    }
}

/// Search engine behavior configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period after the last query edit before a fetch is issued
    pub debounce: Duration,
    /// Number of entries loaded by the startup trending query
    pub trending_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500), // Coalesces typing bursts
            trending_limit: 5,
        }
    }
}

impl MarqueeConfig {
    /// Builds the configuration, applying `MARQUEE_*` environment overrides.
    ///
    /// Any variable that is unset or fails to parse leaves its default in
    /// place.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("MARQUEE_TMDB_BASE_URL") {
            config.catalog.base_url = base_url;
        }
        if let Ok(token) = std::env::var("MARQUEE_TMDB_API_TOKEN") {
            config.catalog.api_token = Some(token);
        }
        if let Ok(image_base) = std::env::var("MARQUEE_IMAGE_BASE_URL") {
            config.catalog.image_base_url = image_base;
        }

        if let Ok(endpoint) = std::env::var("MARQUEE_APPWRITE_ENDPOINT") {
            config.trend_store.endpoint = endpoint;
        }
        if let Ok(project_id) = std::env::var("MARQUEE_APPWRITE_PROJECT_ID") {
            config.trend_store.project_id = project_id;
        }
        if let Ok(api_key) = std::env::var("MARQUEE_APPWRITE_API_KEY") {
            config.trend_store.api_key = Some(api_key);
        }
        if let Ok(database_id) = std::env::var("MARQUEE_APPWRITE_DATABASE_ID") {
            config.trend_store.database_id = database_id;
        }
        if let Ok(collection_id) = std::env::var("MARQUEE_APPWRITE_COLLECTION_ID") {
            config.trend_store.collection_id = collection_id;
        }

        if let Ok(debounce_ms) = std::env::var("MARQUEE_DEBOUNCE_MS")
            && let Ok(millis) = debounce_ms.parse::<u64>()
        {
            config.search.debounce = Duration::from_millis(millis);
        }
        if let Ok(limit) = std::env::var("MARQUEE_TRENDING_LIMIT")
            && let Ok(count) = limit.parse::<usize>()
        {
            config.search.trending_limit = count;
        }

        config
    }

    /// Configuration preset for tests: a short debounce so suites settle
    /// quickly.
    pub fn for_testing() -> Self {
        Self {
            search: SearchConfig {
                debounce: Duration::from_millis(25),
                trending_limit: 5,
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MarqueeConfig::default();

        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.catalog.api_token, None);
        assert_eq!(
            config.catalog.image_base_url,
            "https://image.tmdb.org/t/p/w500"
        );
        assert_eq!(config.search.debounce, Duration::from_millis(500));
        assert_eq!(config.search.trending_limit, 5);
    }

    #[test]
    fn test_testing_config() {
        let config = MarqueeConfig::for_testing();

        assert_eq!(config.search.debounce, Duration::from_millis(25));
        assert_eq!(config.search.trending_limit, 5);
    }

    // Single test so parallel runs never race on the shared variables.
    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("MARQUEE_TMDB_API_TOKEN", "test-bearer-token");
            std::env::set_var("MARQUEE_DEBOUNCE_MS", "250");
            std::env::set_var("MARQUEE_TRENDING_LIMIT", "10");
        }

        let config = MarqueeConfig::from_env();

        assert_eq!(
            config.catalog.api_token,
            Some("test-bearer-token".to_string())
        );
        assert_eq!(config.search.debounce, Duration::from_millis(250));
        assert_eq!(config.search.trending_limit, 10);

        // Unparseable numeric values fall back to the default.
        unsafe {
            std::env::set_var("MARQUEE_DEBOUNCE_MS", "not-a-number");
        }
        let config = MarqueeConfig::from_env();
        assert_eq!(config.search.debounce, Duration::from_millis(500));

        unsafe {
            std::env::remove_var("MARQUEE_TMDB_API_TOKEN");
            std::env::remove_var("MARQUEE_DEBOUNCE_MS");
            std::env::remove_var("MARQUEE_TRENDING_LIMIT");
        }
    }
}
