//! HTTP client for the document store API

use crate::error::{Result, StoreError};
use crate::types::*;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// HTTP client for the document store API
///
/// Every call carries the acting user's bearer token; the client itself
/// holds no session.
///
/// # Example
///
/// ```rust,no_run
/// use feed_store_client::{StoreClient, StoreConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = StoreClient::new(StoreConfig {
///     base_url: "http://localhost:8080".into(),
///     project_id: "g-network-community".into(),
///     ..Default::default()
/// })?;
///
/// let mut fields = serde_json::Map::new();
/// fields.insert("text".into(), "hi".into());
/// let id = client.create_document("posts", &fields, "id-token").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StoreClient {
    config: StoreConfig,
    client: Client,
}

impl StoreClient {
    /// Create a new store client
    pub fn new(config: StoreConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(StoreError::Client("store base_url must be non-empty".into()));
        }
        if config.project_id.trim().is_empty() {
            return Err(StoreError::Client("store project_id must be non-empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the client configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run a query against a collection
    ///
    /// Clauses are serialized as-is and interpreted by the server.
    pub async fn run_query<C: Serialize>(
        &self,
        collection: &str,
        clauses: &[C],
        token: &str,
    ) -> Result<Vec<RemoteDocument>> {
        let url = format!("{}:runQuery", self.collection_url(collection));
        tracing::debug!(collection, clauses = clauses.len(), "running query");

        let response = self
            .authorized(self.client.post(&url), token)
            .json(&RunQueryRequest { clauses })
            .send()
            .await?;

        let body: RunQueryResponse = self.handle_response(response).await?;
        Ok(body.documents)
    }

    /// Create a document, returning its server-assigned ID
    pub async fn create_document(
        &self,
        collection: &str,
        fields: &serde_json::Map<String, serde_json::Value>,
        token: &str,
    ) -> Result<String> {
        let url = self.collection_url(collection);
        tracing::debug!(collection, "creating document");

        let response = self
            .authorized(self.client.post(&url), token)
            .json(&WriteDocumentRequest { fields })
            .send()
            .await?;

        let body: CreateDocumentResponse = self.handle_response(response).await?;
        if body.id.is_empty() {
            return Err(StoreError::InvalidResponse("empty document id".into()));
        }
        Ok(body.id)
    }

    /// Merge fields into an existing document
    pub async fn update_document(
        &self,
        collection: &str,
        doc_id: &str,
        fields: &serde_json::Map<String, serde_json::Value>,
        token: &str,
    ) -> Result<()> {
        let url = self.document_url(collection, doc_id);
        tracing::debug!(collection, doc_id, "updating document");

        let response = self
            .authorized(self.client.patch(&url), token)
            .json(&WriteDocumentRequest { fields })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{}/{}", collection, doc_id)));
        }
        Self::check_status(response).await
    }

    /// Delete a document
    ///
    /// Returns `false` when the document did not exist.
    pub async fn delete_document(&self, collection: &str, doc_id: &str, token: &str) -> Result<bool> {
        let url = self.document_url(collection, doc_id);
        tracing::debug!(collection, doc_id, "deleting document");

        let response = self
            .authorized(self.client.delete(&url), token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check_status(response).await?;
        Ok(true)
    }

    // ==================== Helper Methods ====================

    fn documents_root(&self) -> String {
        format!(
            "{}/v1/projects/{}/documents",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.project_id)
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_root(), encode_path(collection))
    }

    fn document_url(&self, collection: &str, doc_id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            urlencoding::encode(doc_id)
        )
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        let request = request.bearer_auth(token);
        match self.config.api_key {
            Some(ref key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<()> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status,
                message: body,
            });
        }
        Ok(())
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound("Resource not found".to_string()));
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status,
                message: body,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }
}

/// Percent-encode each segment of a slash-separated collection path
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(encode_path("posts"), "posts");
        assert_eq!(encode_path("users/u 1/followers"), "users/u%201/followers");
    }

    #[test]
    fn test_rejects_empty_project() {
        let err = StoreClient::new(StoreConfig {
            project_id: "  ".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::Client(_)));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_document_url() {
        let client = StoreClient::new(StoreConfig {
            base_url: "http://store.local/".into(),
            project_id: "feed".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.document_url("posts", "a/b"),
            "http://store.local/v1/projects/feed/documents/posts/a%2Fb"
        );
    }
}
