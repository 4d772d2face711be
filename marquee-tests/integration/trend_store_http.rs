//! Wire-level tests for the trend store client against an emulated API.

use marquee_core::trending::{AppwriteTrendStore, TrendStore, TrendStoreError};
use marquee_core::types::MovieSummary;
use serde_json::{Value, json};

use crate::support::{TrendStoreEmulator, trend_config};

fn first_result() -> MovieSummary {
    MovieSummary {
        id: 603,
        title: "The Matrix".to_string(),
        poster_path: Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg".to_string()),
        vote_average: Some(8.2),
        release_date: Some("1999-03-31".to_string()),
        original_language: "en".to_string(),
    }
}

fn store_for(endpoint: String) -> AppwriteTrendStore {
    AppwriteTrendStore::new(
        trend_config(endpoint),
        "https://image.example/w500".to_string(),
    )
}

#[tokio::test]
async fn test_first_record_creates_document_with_unique_id_request() {
    let emulator = TrendStoreEmulator::new();
    let store = store_for(emulator.spawn().await);

    store
        .try_record_search("matrix", &first_result())
        .await
        .unwrap();

    assert_eq!(emulator.document_count(), 1);
    assert_eq!(emulator.count_for("matrix"), Some(1));

    // Creation must delegate id minting to the server.
    let creates = emulator.create_requests.lock();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0]["documentId"], json!("unique()"));
    assert_eq!(creates[0]["data"]["movie_id"], json!(603));
    assert_eq!(
        creates[0]["data"]["poster_url"],
        json!("https://image.example/w500/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg")
    );
}

#[tokio::test]
async fn test_repeat_record_increments_without_duplicating() {
    let emulator = TrendStoreEmulator::new();
    let store = store_for(emulator.spawn().await);

    store
        .try_record_search("matrix", &first_result())
        .await
        .unwrap();
    store
        .try_record_search("matrix", &first_result())
        .await
        .unwrap();

    assert_eq!(emulator.document_count(), 1);
    assert_eq!(emulator.count_for("matrix"), Some(2));
    // Exactly one create; the second record went through the update path.
    assert_eq!(emulator.create_requests.lock().len(), 1);
}

#[tokio::test]
async fn test_distinct_terms_get_distinct_documents() {
    let emulator = TrendStoreEmulator::new();
    let store = store_for(emulator.spawn().await);

    store
        .try_record_search("matrix", &first_result())
        .await
        .unwrap();
    store
        .try_record_search("dune", &first_result())
        .await
        .unwrap();

    assert_eq!(emulator.document_count(), 2);
    assert_eq!(emulator.count_for("matrix"), Some(1));
    assert_eq!(emulator.count_for("dune"), Some(1));
}

#[tokio::test]
async fn test_trending_orders_by_count_desc_and_caps_at_limit() {
    let emulator = TrendStoreEmulator::new();
    for (term, count) in [("a", 3), ("b", 9), ("c", 1), ("d", 7), ("e", 2), ("f", 5)] {
        emulator.seed(term, count);
    }
    let store = store_for(emulator.spawn().await);

    let entries = store.try_trending(5).await.unwrap();

    let terms: Vec<&str> = entries.iter().map(|e| e.search_term.as_str()).collect();
    assert_eq!(terms, vec!["b", "d", "f", "a", "e"]);
    let counts: Vec<u64> = entries.iter().map(|e| e.count).collect();
    assert_eq!(counts, vec![9, 7, 5, 3, 2]);
}

#[tokio::test]
async fn test_every_request_carries_project_header() {
    let emulator = TrendStoreEmulator::new();
    let store = store_for(emulator.spawn().await);

    store
        .try_record_search("matrix", &first_result())
        .await
        .unwrap();
    store.try_trending(5).await.unwrap();

    let projects = emulator.project_headers.lock();
    // Record runs a list plus a create, trending runs one more list.
    assert_eq!(projects.len(), 3);
    assert!(projects.iter().all(|p| p == "marquee-test"));
}

#[tokio::test]
async fn test_store_failure_maps_to_request_failed() {
    let emulator = TrendStoreEmulator::new();
    let store = store_for(emulator.spawn().await);
    *emulator.fail_all.lock() = true;

    let error = store
        .try_record_search("matrix", &first_result())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        TrendStoreError::RequestFailed { status: 500 }
    ));

    // The best-effort surface swallows the same failure.
    store.record_search("matrix", &first_result()).await;
    assert!(store.trending(5).await.is_empty());
    assert_eq!(emulator.document_count(), 0);
}

#[tokio::test]
async fn test_created_document_round_trips_through_raw_api() {
    let emulator = TrendStoreEmulator::new();
    let endpoint = emulator.spawn().await;
    let store = store_for(endpoint.clone());

    store
        .try_record_search("matrix", &first_result())
        .await
        .unwrap();

    // Read the collection back with a plain HTTP client, independent of the
    // store client under test.
    let url = format!("{endpoint}/databases/main/collections/searches/documents");
    let body: Value = reqwest::Client::new()
        .get(&url)
        .header("X-Appwrite-Project", "marquee-test")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let documents = body["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["searchTerm"], json!("matrix"));
    assert_eq!(documents[0]["count"], json!(1));
    assert!(documents[0]["$id"].as_str().is_some());
}
