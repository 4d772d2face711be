//! End-to-end tests: the full engine actor over emulated external services.
//!
//! The production catalog and trend-store clients run unmodified against the
//! in-process emulators, so these tests cover the complete path from query
//! edit to rendered state to recorded counter.

use std::time::Duration;

use axum::http::StatusCode;
use marquee_core::catalog::TmdbCatalog;
use marquee_core::config::MarqueeConfig;
use marquee_core::engine::{SearchHandle, UiState, spawn_search_engine};
use marquee_core::trending::AppwriteTrendStore;
use serde_json::json;

use crate::support::{CatalogEmulator, TrendStoreEmulator, movie_json, trend_config};

fn engine_config(catalog_base: String, trend_endpoint: String) -> MarqueeConfig {
    let mut config = MarqueeConfig::for_testing();
    config.catalog.base_url = catalog_base;
    config.catalog.api_token = Some("test-token".to_string());
    config.catalog.image_base_url = "https://image.example/w500".to_string();
    // Real sockets are in play; leave the edit burst generous room.
    config.search.debounce = Duration::from_millis(150);
    config.trend_store = trend_config(trend_endpoint);
    config
}

async fn spawn_engine(catalog: &CatalogEmulator, trends: &TrendStoreEmulator) -> SearchHandle {
    let config = engine_config(catalog.spawn().await, trends.spawn().await);
    let tmdb = TmdbCatalog::new(config.catalog.clone());
    let store = AppwriteTrendStore::new(
        config.trend_store.clone(),
        config.catalog.image_base_url.clone(),
    );
    spawn_search_engine(config, tmdb, store)
}

/// Polls until `debounced` has been committed and its fetch applied.
async fn settled_state(handle: &SearchHandle, debounced: &str) -> UiState {
    for _ in 0..400 {
        let state = handle.snapshot().await.unwrap();
        if state.debounced_query == debounced && !state.loading {
            return state;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("engine never settled for query '{debounced}'");
}

#[tokio::test]
async fn test_search_flow_renders_results_and_records_once() {
    let catalog = CatalogEmulator::new();
    catalog.set_discover_reply(
        StatusCode::OK,
        json!({ "results": [movie_json(1, "Popular")] }),
    );
    catalog.set_search_reply(
        StatusCode::OK,
        json!({ "results": [movie_json(603, "The Matrix"), movie_json(604, "Reloaded")] }),
    );
    let trends = TrendStoreEmulator::new();
    let handle = spawn_engine(&catalog, &trends).await;

    // Startup shows the popularity listing without recording anything.
    let state = settled_state(&handle, "").await;
    assert_eq!(state.results.len(), 1);

    handle.set_query("matrix").await.unwrap();
    let state = settled_state(&handle, "matrix").await;

    assert_eq!(state.error, None);
    assert_eq!(state.results.len(), 2);
    assert_eq!(state.results[0].title, "The Matrix");

    // Recording is detached; wait for the counter to land.
    for _ in 0..400 {
        if trends.document_count() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert_eq!(trends.document_count(), 1);
    assert_eq!(trends.count_for("matrix"), Some(1));
    let creates = trends.create_requests.lock().clone();
    assert_eq!(creates[0]["data"]["movie_id"], json!(603));

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_edit_burst_reaches_catalog_once() {
    let catalog = CatalogEmulator::new();
    catalog.set_search_reply(
        StatusCode::OK,
        json!({ "results": [movie_json(603, "The Matrix")] }),
    );
    let trends = TrendStoreEmulator::new();
    let handle = spawn_engine(&catalog, &trends).await;

    settled_state(&handle, "").await;

    handle.set_query("m").await.unwrap();
    handle.set_query("ma").await.unwrap();
    handle.set_query("mat").await.unwrap();
    let state = settled_state(&handle, "mat").await;

    assert_eq!(state.results.len(), 1);
    assert_eq!(
        *catalog.search_queries.lock(),
        vec!["mat".to_string()],
        "intermediate edits must never reach the catalog"
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_catalog_failure_surfaces_message_and_skips_recording() {
    let catalog = CatalogEmulator::new();
    catalog.set_search_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "status_message": "boom" }),
    );
    let trends = TrendStoreEmulator::new();
    let handle = spawn_engine(&catalog, &trends).await;

    settled_state(&handle, "").await;

    handle.set_query("broken").await.unwrap();
    let state = settled_state(&handle, "broken").await;

    assert_eq!(state.error.as_deref(), Some("Failed to fetch movies"));
    assert!(state.results.is_empty());

    // No successful results, so nothing may be recorded.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(trends.document_count(), 0);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_trend_store_outage_never_blocks_search() {
    let catalog = CatalogEmulator::new();
    catalog.set_search_reply(
        StatusCode::OK,
        json!({ "results": [movie_json(603, "The Matrix")] }),
    );
    let trends = TrendStoreEmulator::new();
    *trends.fail_all.lock() = true;
    let handle = spawn_engine(&catalog, &trends).await;

    handle.set_query("matrix").await.unwrap();
    let state = settled_state(&handle, "matrix").await;

    // The failed recording stays invisible to the search surface.
    assert_eq!(state.error, None);
    assert_eq!(state.results.len(), 1);
    assert_eq!(trends.document_count(), 0);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_trending_list_loads_from_store_at_startup() {
    let catalog = CatalogEmulator::new();
    let trends = TrendStoreEmulator::new();
    trends.seed("movies", 9);
    trends.seed("rust", 4);
    let handle = spawn_engine(&catalog, &trends).await;

    let mut trending = Vec::new();
    for _ in 0..400 {
        trending = handle.snapshot().await.unwrap().trending;
        if !trending.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    let terms: Vec<&str> = trending.iter().map(|e| e.search_term.as_str()).collect();
    assert_eq!(terms, vec!["movies", "rust"]);
    assert_eq!(trending[0].count, 9);

    handle.shutdown().await.unwrap();
}
