//! Appwrite document store client for trend counters.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{TrendStore, TrendStoreError};
use crate::config::TrendStoreConfig;
use crate::types::{MovieSummary, TrendEntry};

/// Appwrite Databases client for the trend counter collection.
///
/// Speaks the hosted REST API directly: equality-filtered document lists,
/// document creation with a server-minted id, and partial updates for the
/// count increment. All operations target the single configured collection.
#[derive(Debug)]
pub struct AppwriteTrendStore {
    client: reqwest::Client,
    config: TrendStoreConfig,
    image_base_url: String,
}

/// Document list response from the Databases API.
#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TrendDocument>,
}

/// One counter document as stored in the collection.
#[derive(Debug, Deserialize)]
struct TrendDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    count: u64,
    #[serde(default)]
    movie_id: u64,
    #[serde(default)]
    poster_url: String,
}

impl TrendDocument {
    fn into_entry(self) -> TrendEntry {
        TrendEntry {
            id: self.id,
            search_term: self.search_term,
            count: self.count,
            movie_id: self.movie_id,
            poster_url: self.poster_url,
        }
    }
}

impl AppwriteTrendStore {
    /// Creates a trend store client for the configured collection.
    ///
    /// `image_base_url` is the poster host prefix baked into new counter
    /// documents, so trending rows can render a poster without a catalog
    /// round-trip.
    pub fn new(config: TrendStoreConfig, image_base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            image_base_url,
        }
    }

    /// Documents endpoint for the configured database and collection.
    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint, self.config.database_id, self.config.collection_id
        )
    }

    /// Attaches the project header and, when configured, the API key header.
    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("X-Appwrite-Project", &self.config.project_id);
        match &self.config.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key),
            None => builder,
        }
    }

    fn transport(error: reqwest::Error) -> TrendStoreError {
        TrendStoreError::Transport {
            reason: error.to_string(),
        }
    }

    fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, TrendStoreError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(TrendStoreError::RequestFailed {
                status: response.status().as_u16(),
            })
        }
    }

    /// Looks up the counter document holding exactly `term`, if any.
    async fn find_by_term(&self, term: &str) -> Result<Option<TrendDocument>, TrendStoreError> {
        let filter = json!({
            "method": "equal",
            "attribute": "searchTerm",
            "values": [term],
        });

        let response = self
            .authed(self.client.get(self.documents_url()))
            .query(&[("queries[]", filter.to_string())])
            .send()
            .await
            .map_err(Self::transport)?;
        let response = Self::expect_success(response)?;

        let list: DocumentList = response.json().await.map_err(|e| TrendStoreError::Decode {
            reason: e.to_string(),
        })?;
        Ok(list.documents.into_iter().next())
    }

    /// Creates the first counter document for `term`.
    async fn create_counter(
        &self,
        term: &str,
        first_result: &MovieSummary,
    ) -> Result<(), TrendStoreError> {
        let body = json!({
            "documentId": "unique()",
            "data": {
                "searchTerm": term,
                "count": 1,
                "movie_id": first_result.id,
                "poster_url": first_result
                    .poster_url(&self.image_base_url)
                    .unwrap_or_default(),
            },
        });

        let response = self
            .authed(self.client.post(self.documents_url()))
            .json(&body)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::expect_success(response)?;
        Ok(())
    }

    /// Writes back `count + 1` for an existing counter document.
    async fn increment_counter(&self, document: &TrendDocument) -> Result<(), TrendStoreError> {
        let url = format!("{}/{}", self.documents_url(), document.id);
        let body = json!({
            "data": { "count": document.count + 1 },
        });

        let response = self
            .authed(self.client.patch(&url))
            .json(&body)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::expect_success(response)?;
        Ok(())
    }
}

#[async_trait]
impl TrendStore for AppwriteTrendStore {
    async fn try_record_search(
        &self,
        term: &str,
        first_result: &MovieSummary,
    ) -> Result<(), TrendStoreError> {
        match self.find_by_term(term).await? {
            Some(document) => self.increment_counter(&document).await,
            None => self.create_counter(term, first_result).await,
        }
    }

    async fn try_trending(&self, limit: usize) -> Result<Vec<TrendEntry>, TrendStoreError> {
        let order = json!({ "method": "orderDesc", "attribute": "count" });
        let cap = json!({ "method": "limit", "values": [limit] });

        let response = self
            .authed(self.client.get(self.documents_url()))
            .query(&[
                ("queries[]", order.to_string()),
                ("queries[]", cap.to_string()),
            ])
            .send()
            .await
            .map_err(Self::transport)?;
        let response = Self::expect_success(response)?;

        let list: DocumentList = response.json().await.map_err(|e| TrendStoreError::Decode {
            reason: e.to_string(),
        })?;
        Ok(list
            .documents
            .into_iter()
            .map(TrendDocument::into_entry)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AppwriteTrendStore {
        AppwriteTrendStore::new(
            TrendStoreConfig {
                endpoint: "https://nyc.cloud.appwrite.io/v1".to_string(),
                project_id: "marquee".to_string(),
                api_key: None,
                database_id: "main".to_string(),
                collection_id: "searches".to_string(),
            },
            "https://image.tmdb.org/t/p/w500".to_string(),
        )
    }

    #[test]
    fn test_documents_url_layout() {
        assert_eq!(
            store().documents_url(),
            "https://nyc.cloud.appwrite.io/v1/databases/main/collections/searches/documents"
        );
    }

    #[test]
    fn test_document_decodes_from_api_shape() {
        let raw = r#"{
            "$id": "6638abc",
            "$createdAt": "2024-05-06T09:30:00.000+00:00",
            "searchTerm": "matrix",
            "count": 4,
            "movie_id": 603,
            "poster_url": "https://image.tmdb.org/t/p/w500/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"
        }"#;
        let document: TrendDocument = serde_json::from_str(raw).unwrap();
        let entry = document.into_entry();

        assert_eq!(entry.id, "6638abc");
        assert_eq!(entry.search_term, "matrix");
        assert_eq!(entry.count, 4);
        assert_eq!(entry.movie_id, 603);
    }

    #[test]
    fn test_empty_document_list_decodes() {
        let list: DocumentList = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(list.documents.is_empty());
    }
}
