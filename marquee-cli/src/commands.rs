//! Subcommand implementations for the marquee binary.

use std::time::Duration;

use clap::Subcommand;
use marquee_core::catalog::{DemoCatalog, TmdbCatalog};
use marquee_core::config::MarqueeConfig;
use marquee_core::engine::{SearchHandle, UiState, spawn_search_engine};
use marquee_core::trending::{AppwriteTrendStore, MemoryTrendStore, TrendStore};
use marquee_core::types::TrendEntry;
use marquee_core::{MarqueeError, Result, RuntimeMode};
use tokio::io::AsyncBufReadExt;

/// Poll interval while waiting for a fetch to settle.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Everything the marquee binary can do.
#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog and record the search in the trending counters
    Search {
        /// Query text, used exactly as typed
        query: String,
    },
    /// List popular movies from the catalog discovery endpoint
    Discover,
    /// Show the most-searched terms
    Trending {
        /// Number of entries to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
    /// Interactive session: every stdin line edits the debounced query
    Live,
}

/// Dispatches one parsed subcommand.
///
/// # Errors
/// Propagates whatever the selected command fails with
pub async fn handle_command(mode: RuntimeMode, command: Commands) -> Result<()> {
    let config = MarqueeConfig::from_env();

    match command {
        Commands::Search { query } => search(mode, config, query).await,
        Commands::Discover => discover(mode, config).await,
        Commands::Trending { limit } => show_trending(mode, config, limit).await,
        Commands::Live => live(mode, config).await,
    }
}

/// Run one search through the engine and print the settled results.
///
/// # Errors
/// - `MarqueeError::Configuration` - Production mode without an API token
/// - `MarqueeError::EngineShutdown` - Engine stopped before answering
pub async fn search(mode: RuntimeMode, config: MarqueeConfig, query: String) -> Result<()> {
    let handle = spawn_engine(mode, &config)?;

    handle.set_query(&query).await?;
    let state = wait_for_query(&handle, &query).await?;

    print_results(&state);

    // Trend recording is detached from the fetch; give it a beat before the
    // process exits.
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.shutdown().await?;
    Ok(())
}

/// Print the popularity-ordered discovery listing.
///
/// # Errors
/// - `MarqueeError::Configuration` - Production mode without an API token
/// - `MarqueeError::EngineShutdown` - Engine stopped before answering
pub async fn discover(mode: RuntimeMode, config: MarqueeConfig) -> Result<()> {
    let handle = spawn_engine(mode, &config)?;

    // The engine fetches the empty query on startup; just wait for it.
    let state = wait_for_query(&handle, "").await?;
    print_results(&state);

    handle.shutdown().await?;
    Ok(())
}

/// Print the most-searched terms straight from the trend store.
///
/// # Errors
/// - `MarqueeError::TrendStore` - Store request failed
pub async fn show_trending(mode: RuntimeMode, config: MarqueeConfig, limit: usize) -> Result<()> {
    let entries = match mode {
        RuntimeMode::Production => {
            production_trend_store(&config).try_trending(limit).await?
        }
        RuntimeMode::Development => MemoryTrendStore::new().try_trending(limit).await?,
    };

    print_trending(&entries);
    Ok(())
}

/// Interactive search session reading query edits from stdin.
///
/// # Errors
/// - `MarqueeError::Configuration` - Production mode without an API token
/// - `MarqueeError::EngineShutdown` - Engine stopped before answering
/// - `MarqueeError::Io` - Reading stdin failed
pub async fn live(mode: RuntimeMode, config: MarqueeConfig) -> Result<()> {
    let handle = spawn_engine(mode, &config)?;

    println!("Live search in {mode} mode (one query per line, Ctrl-D to quit)");
    println!("{:-<72}", "");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        handle.set_query(&line).await?;
        let state = wait_for_query(&handle, &line).await?;
        print_results(&state);
        println!();
    }

    let state = handle.snapshot().await?;
    print_trending(&state.trending);

    handle.shutdown().await?;
    Ok(())
}

/// Wires catalog and trend store backends for the runtime mode and spawns
/// the engine actor.
///
/// # Errors
/// - `MarqueeError::Configuration` - Production mode without a catalog API token
fn spawn_engine(mode: RuntimeMode, config: &MarqueeConfig) -> Result<SearchHandle> {
    match mode {
        RuntimeMode::Production => {
            if config.catalog.api_token.is_none() {
                return Err(MarqueeError::Configuration {
                    reason: "production mode needs MARQUEE_TMDB_API_TOKEN".to_string(),
                });
            }
            if config.trend_store.project_id.is_empty() {
                tracing::warn!(
                    "MARQUEE_APPWRITE_PROJECT_ID is not set; searches will not be recorded"
                );
            }

            let catalog = TmdbCatalog::new(config.catalog.clone());
            let store = production_trend_store(config);
            Ok(spawn_search_engine(config.clone(), catalog, store))
        }
        RuntimeMode::Development => Ok(spawn_search_engine(
            config.clone(),
            DemoCatalog::new(),
            MemoryTrendStore::with_image_base(config.catalog.image_base_url.clone()),
        )),
    }
}

fn production_trend_store(config: &MarqueeConfig) -> AppwriteTrendStore {
    AppwriteTrendStore::new(
        config.trend_store.clone(),
        config.catalog.image_base_url.clone(),
    )
}

/// Polls the engine until `query` has been committed and its fetch applied.
///
/// Network calls carry no timeout, so this waits as long as the fetch runs.
///
/// # Errors
/// - `MarqueeError::EngineShutdown` - Engine stopped before answering
async fn wait_for_query(handle: &SearchHandle, query: &str) -> Result<UiState> {
    loop {
        let state = handle.snapshot().await?;
        if state.debounced_query == query && !state.loading {
            return Ok(state);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Render one settled engine state as a results table.
fn print_results(state: &UiState) {
    if state.debounced_query.is_empty() {
        println!("Popular Movies");
    } else {
        println!("Results for '{}'", state.debounced_query);
    }
    println!("{:-<72}", "");

    if let Some(error) = &state.error {
        println!("{error}");
        return;
    }

    if state.results.is_empty() {
        println!("No movies found.");
        return;
    }

    for movie in &state.results {
        println!(
            "{:<50} {:>4}  {:>4}  {}",
            truncate(&movie.title, 50),
            movie.rating_label(),
            movie.release_year(),
            movie.original_language
        );
    }
}

/// Render trending counters as a ranked list.
fn print_trending(entries: &[TrendEntry]) {
    println!("Trending Searches");
    println!("{:-<72}", "");

    if entries.is_empty() {
        println!("No trending searches recorded yet.");
        return;
    }

    for (index, entry) in entries.iter().enumerate() {
        println!(
            "{:>2}. {:<44} {:>6} searches",
            index + 1,
            truncate(&entry.search_term, 44),
            entry.count
        );
    }
}

/// Clips text to `max` characters for column alignment.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{clipped}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("The Matrix", 50), "The Matrix");
    }

    #[test]
    fn test_truncate_clips_long_text() {
        let clipped = truncate("A very long movie title that overflows", 20);
        assert_eq!(clipped.chars().count(), 20);
        assert!(clipped.ends_with("..."));
    }

    #[tokio::test]
    async fn test_dev_search_completes() {
        let result = search(
            RuntimeMode::Development,
            MarqueeConfig::for_testing(),
            "matrix".to_string(),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_dev_discover_completes() {
        let result = discover(RuntimeMode::Development, MarqueeConfig::for_testing()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_dev_trending_starts_empty() {
        let result =
            show_trending(RuntimeMode::Development, MarqueeConfig::for_testing(), 5).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_production_search_requires_api_token() {
        // for_testing carries no token, so production wiring must refuse.
        let result = search(
            RuntimeMode::Production,
            MarqueeConfig::for_testing(),
            "matrix".to_string(),
        )
        .await;
        assert!(matches!(
            result,
            Err(MarqueeError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_command_error_renders_terminal_message() {
        // main prints user_message() for whatever handle_command returns.
        let err = search(
            RuntimeMode::Production,
            MarqueeConfig::for_testing(),
            "matrix".to_string(),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.user_message(),
            "Configuration error: production mode needs MARQUEE_TMDB_API_TOKEN"
        );
    }
}
