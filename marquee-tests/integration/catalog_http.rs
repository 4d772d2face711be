//! Wire-level tests for the catalog client against an emulated API.

use axum::http::StatusCode;
use marquee_core::catalog::{CatalogError, CatalogProvider, TmdbCatalog};
use marquee_core::config::CatalogConfig;
use serde_json::json;

use crate::support::{CatalogEmulator, movie_json};

fn client_for(base_url: String) -> TmdbCatalog {
    TmdbCatalog::new(CatalogConfig {
        base_url,
        api_token: Some("test-token".to_string()),
        image_base_url: "https://image.example/w500".to_string(),
    })
}

#[tokio::test]
async fn test_search_sends_escaped_query_and_bearer_token() {
    let emulator = CatalogEmulator::new();
    emulator.set_search_reply(
        StatusCode::OK,
        json!({ "results": [movie_json(603, "The Matrix")] }),
    );
    let catalog = client_for(emulator.spawn().await);

    // Spaces and ampersands must survive the URL round-trip intact.
    let movies = catalog.fetch_movies("tom & jerry").await.unwrap();

    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, 603);
    assert_eq!(
        *emulator.search_queries.lock(),
        vec!["tom & jerry".to_string()]
    );
    assert_eq!(
        *emulator.auth_headers.lock(),
        vec!["Bearer test-token".to_string()]
    );
}

#[tokio::test]
async fn test_empty_query_hits_discover_sorted_by_popularity() {
    let emulator = CatalogEmulator::new();
    emulator.set_discover_reply(
        StatusCode::OK,
        json!({ "results": [movie_json(1, "Popular One"), movie_json(2, "Popular Two")] }),
    );
    let catalog = client_for(emulator.spawn().await);

    let movies = catalog.fetch_movies("").await.unwrap();

    assert_eq!(movies.len(), 2);
    assert!(emulator.search_queries.lock().is_empty());

    let requests = emulator.discover_requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].get("sort_by").map(String::as_str),
        Some("popularity.desc")
    );
}

#[tokio::test]
async fn test_http_error_maps_to_fixed_message() {
    let emulator = CatalogEmulator::new();
    emulator.set_search_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "status_message": "boom" }),
    );
    let catalog = client_for(emulator.spawn().await);

    let error = catalog.fetch_movies("matrix").await.unwrap_err();

    assert!(matches!(
        error,
        CatalogError::RequestFailed { status: 500 }
    ));
    assert_eq!(error.to_string(), "Failed to fetch movies");
}

#[tokio::test]
async fn test_body_failure_flag_surfaces_verbatim_error() {
    let emulator = CatalogEmulator::new();
    emulator.set_search_reply(
        StatusCode::OK,
        json!({
            "Response": "False",
            "Error": "Invalid API key: You must be granted a valid key."
        }),
    );
    let catalog = client_for(emulator.spawn().await);

    let error = catalog.fetch_movies("matrix").await.unwrap_err();

    match error {
        CatalogError::Rejected { ref message } => {
            assert_eq!(message, "Invalid API key: You must be granted a valid key.");
        }
        other => panic!("expected a body rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_body_failure_flag_without_message_uses_fallback() {
    let emulator = CatalogEmulator::new();
    emulator.set_search_reply(StatusCode::OK, json!({ "Response": "False" }));
    let catalog = client_for(emulator.spawn().await);

    let error = catalog.fetch_movies("matrix").await.unwrap_err();

    assert_eq!(error.user_message(), "Failed to fetch movies");
}

#[tokio::test]
async fn test_missing_results_field_decodes_as_empty_list() {
    let emulator = CatalogEmulator::new();
    emulator.set_search_reply(StatusCode::OK, json!({ "page": 1 }));
    let catalog = client_for(emulator.spawn().await);

    let movies = catalog.fetch_movies("matrix").await.unwrap();

    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_maps_to_transport_error() {
    // Nothing listens on the reserved port, so the connection is refused.
    let catalog = client_for("http://127.0.0.1:1".to_string());

    let error = catalog.fetch_movies("matrix").await.unwrap_err();

    assert!(matches!(error, CatalogError::Transport { .. }));
    assert_eq!(
        error.user_message(),
        "Error fetching movies. Please try again later."
    );
}
