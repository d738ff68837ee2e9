//! Error types for the store client

use thiserror::Error;

/// Store client error
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned an error
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be constructed
    #[error("Client setup failed: {0}")]
    Client(String),

    /// Auth API rejected the request
    #[error("Auth error {code}: {message}")]
    Auth { code: u16, message: String },
}

impl StoreError {
    /// Whether the remote service could not be reached at all
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Http(e) => e.is_connect() || e.is_timeout(),
            StoreError::Client(_) => true,
            StoreError::Server { status, .. } => *status == 503,
            _ => false,
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
