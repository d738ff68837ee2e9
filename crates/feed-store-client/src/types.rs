//! Types for the store, auth and posts APIs

use serde::{Deserialize, Serialize};

/// Document store client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the document store HTTP API
    pub base_url: String,
    /// Project the collections live in
    pub project_id: String,
    /// Optional API key, sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            project_id: "default".to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Authentication API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the authentication API
    pub base_url: String,
    /// API key identifying the application
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Posts REST backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsConfig {
    /// Base URL of the REST backend (e.g. "http://localhost:5000")
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// A document as returned by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDocument {
    /// Store-assigned document ID
    pub id: String,
    /// Field values
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Request body for the query endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RunQueryRequest<'a, C: Serialize> {
    /// Clauses, forwarded in caller order
    pub clauses: &'a [C],
}

/// Response from the query endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunQueryResponse {
    #[serde(default)]
    pub documents: Vec<RemoteDocument>,
}

/// Request body for create and update
#[derive(Debug, Clone, Serialize)]
pub struct WriteDocumentRequest<'a> {
    pub fields: &'a serde_json::Map<String, serde_json::Value>,
}

/// Response from the create endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentResponse {
    /// ID assigned to the new document
    pub id: String,
}

/// Request body for password sign-in
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// Successful sign-in response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Stable user ID
    pub local_id: String,
    /// Bearer token for API calls
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoUrl")]
    pub photo_url: Option<String>,
}

/// Error payload returned by the auth API
#[derive(Debug, Clone, Deserialize)]
pub struct AuthErrorResponse {
    pub error: AuthErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

/// A feed post submitted to the REST backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Post text
    pub description: String,
    /// Author user ID
    pub author_id: String,
    /// Author display name
    pub author: String,
    /// Author avatar URL (may be empty)
    pub author_avatar: String,
}
