//! In-process HTTP emulators for the external services.
//!
//! Both emulators bind an ephemeral local port and implement exactly the
//! surface the production clients use: the catalog's search/discover
//! endpoints and the document store's list/create/update operations with
//! `queries[]` filters.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, patch};
use axum::{Json, Router};
use marquee_core::config::TrendStoreConfig;
use parking_lot::Mutex;
use serde_json::{Value, json};

/// Binds a router on an ephemeral local port and serves it in the background.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Catalog-shaped movie record for emulator replies.
pub fn movie_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "poster_path": format!("/poster-{id}.jpg"),
        "vote_average": 7.5,
        "release_date": "2020-01-01",
        "original_language": "en",
    })
}

/// Scriptable stand-in for the movie catalog REST API.
///
/// Serves the text-search and discover endpoints with configurable replies
/// and records every request for assertions.
#[derive(Clone)]
pub struct CatalogEmulator {
    /// Queries received by the search endpoint, in arrival order
    pub search_queries: Arc<Mutex<Vec<String>>>,
    /// Query parameter sets received by the discover endpoint
    pub discover_requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    /// Authorization header values seen, one per request ("" when absent)
    pub auth_headers: Arc<Mutex<Vec<String>>>,
    search_reply: Arc<Mutex<(StatusCode, Value)>>,
    discover_reply: Arc<Mutex<(StatusCode, Value)>>,
}

impl CatalogEmulator {
    pub fn new() -> Self {
        let empty_page = json!({ "results": [] });
        Self {
            search_queries: Arc::new(Mutex::new(Vec::new())),
            discover_requests: Arc::new(Mutex::new(Vec::new())),
            auth_headers: Arc::new(Mutex::new(Vec::new())),
            search_reply: Arc::new(Mutex::new((StatusCode::OK, empty_page.clone()))),
            discover_reply: Arc::new(Mutex::new((StatusCode::OK, empty_page))),
        }
    }

    pub fn set_search_reply(&self, status: StatusCode, body: Value) {
        *self.search_reply.lock() = (status, body);
    }

    pub fn set_discover_reply(&self, status: StatusCode, body: Value) {
        *self.discover_reply.lock() = (status, body);
    }

    /// Serves the emulator and returns the catalog base URL.
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/search/movie", get(search_movies))
            .route("/discover/movie", get(discover_movies))
            .with_state(self.clone());
        let addr = spawn_server(router).await;
        format!("http://{addr}")
    }

    fn record_auth(&self, headers: &HeaderMap) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        self.auth_headers.lock().push(auth.to_string());
    }
}

async fn search_movies(
    State(emulator): State<CatalogEmulator>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    emulator.record_auth(&headers);
    emulator
        .search_queries
        .lock()
        .push(params.get("query").cloned().unwrap_or_default());

    let (status, body) = emulator.search_reply.lock().clone();
    (status, Json(body))
}

async fn discover_movies(
    State(emulator): State<CatalogEmulator>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    emulator.record_auth(&headers);
    emulator.discover_requests.lock().push(params);

    let (status, body) = emulator.discover_reply.lock().clone();
    (status, Json(body))
}

/// Stand-in for the hosted document store's Databases API.
///
/// Implements the query-then-write surface the trend client uses:
/// equality-filtered listing, document creation with a server-minted id,
/// count patches, and orderDesc+limit listing.
#[derive(Clone)]
pub struct TrendStoreEmulator {
    /// Stored counter documents, each carrying its `$id`
    pub documents: Arc<Mutex<Vec<Value>>>,
    /// Full bodies of create requests, in arrival order
    pub create_requests: Arc<Mutex<Vec<Value>>>,
    /// Project header values seen, one per request ("" when absent)
    pub project_headers: Arc<Mutex<Vec<String>>>,
    /// When true, every route answers 500
    pub fail_all: Arc<Mutex<bool>>,
    next_id: Arc<Mutex<u64>>,
}

impl TrendStoreEmulator {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(Vec::new())),
            create_requests: Arc::new(Mutex::new(Vec::new())),
            project_headers: Arc::new(Mutex::new(Vec::new())),
            fail_all: Arc::new(Mutex::new(false)),
            next_id: Arc::new(Mutex::new(0)),
        }
    }

    /// Serves the emulator and returns its endpoint URL (with the API prefix).
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route(
                "/v1/databases/{database_id}/collections/{collection_id}/documents",
                get(list_documents).post(create_document),
            )
            .route(
                "/v1/databases/{database_id}/collections/{collection_id}/documents/{document_id}",
                patch(update_document),
            )
            .with_state(self.clone());
        let addr = spawn_server(router).await;
        format!("http://{addr}/v1")
    }

    /// Inserts a counter document directly, bypassing the HTTP surface.
    pub fn seed(&self, term: &str, count: u64) {
        let id = self.mint_id();
        self.documents.lock().push(json!({
            "$id": id,
            "searchTerm": term,
            "count": count,
            "movie_id": 600 + count,
            "poster_url": format!("https://image.example/w500/{term}.jpg"),
        }));
    }

    pub fn document_count(&self) -> usize {
        self.documents.lock().len()
    }

    /// Count stored for `term`, if its document exists.
    pub fn count_for(&self, term: &str) -> Option<u64> {
        self.documents
            .lock()
            .iter()
            .find(|doc| doc["searchTerm"] == json!(term))
            .and_then(|doc| doc["count"].as_u64())
    }

    fn mint_id(&self) -> String {
        let mut next = self.next_id.lock();
        *next += 1;
        format!("doc-{next}")
    }

    fn record_project(&self, headers: &HeaderMap) {
        let project = headers
            .get("X-Appwrite-Project")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        self.project_headers.lock().push(project.to_string());
    }

    fn failure(&self) -> Option<(StatusCode, Json<Value>)> {
        self.fail_all.lock().then(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal server error" })),
            )
        })
    }
}

/// Store configuration pointing a trend client at an emulator endpoint.
pub fn trend_config(endpoint: String) -> TrendStoreConfig {
    TrendStoreConfig {
        endpoint,
        project_id: "marquee-test".to_string(),
        api_key: Some("test-key".to_string()),
        database_id: "main".to_string(),
        collection_id: "searches".to_string(),
    }
}

async fn list_documents(
    State(emulator): State<TrendStoreEmulator>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    emulator.record_project(&headers);
    if let Some(failure) = emulator.failure() {
        return failure;
    }

    let mut documents = emulator.documents.lock().clone();
    let mut limit = documents.len();

    for (key, value) in pairs {
        if key != "queries[]" {
            continue;
        }
        let Ok(query) = serde_json::from_str::<Value>(&value) else {
            continue;
        };
        match query["method"].as_str() {
            Some("equal") => {
                let attribute = query["attribute"].as_str().unwrap_or_default().to_string();
                let needle = query["values"][0].clone();
                documents.retain(|doc| doc[&attribute] == needle);
            }
            Some("orderDesc") => {
                let attribute = query["attribute"].as_str().unwrap_or_default().to_string();
                documents
                    .sort_by_key(|doc| std::cmp::Reverse(doc[&attribute].as_u64().unwrap_or(0)));
            }
            Some("limit") => {
                limit = query["values"][0].as_u64().unwrap_or(limit as u64) as usize;
            }
            _ => {}
        }
    }
    documents.truncate(limit);

    (
        StatusCode::OK,
        Json(json!({ "total": documents.len(), "documents": documents })),
    )
}

async fn create_document(
    State(emulator): State<TrendStoreEmulator>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    emulator.record_project(&headers);
    if let Some(failure) = emulator.failure() {
        return failure;
    }

    emulator.create_requests.lock().push(body.clone());

    let mut document = body["data"].clone();
    document["$id"] = json!(emulator.mint_id());
    emulator.documents.lock().push(document.clone());

    (StatusCode::CREATED, Json(document))
}

async fn update_document(
    State(emulator): State<TrendStoreEmulator>,
    Path((_database_id, _collection_id, document_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    emulator.record_project(&headers);
    if let Some(failure) = emulator.failure() {
        return failure;
    }

    let mut documents = emulator.documents.lock();
    match documents
        .iter_mut()
        .find(|doc| doc["$id"] == json!(document_id.clone()))
    {
        Some(document) => {
            if let Some(fields) = body["data"].as_object() {
                for (key, value) in fields {
                    document[key] = value.clone();
                }
            }
            (StatusCode::OK, Json(document.clone()))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Document not found" })),
        ),
    }
}
