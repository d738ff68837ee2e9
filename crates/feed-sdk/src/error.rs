//! Error types for the feed SDK

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// SDK error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No signed-in user where one is required
    #[error("Authentication required")]
    AuthRequired,

    /// Backing service unreachable or never initialized
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The remote call failed
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// Caller supplied a malformed argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[cfg(feature = "client")]
impl From<feed_store_client::StoreError> for GatewayError {
    fn from(err: feed_store_client::StoreError) -> Self {
        if err.is_unavailable() {
            GatewayError::StoreUnavailable(err.to_string())
        } else {
            GatewayError::OperationFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for GatewayError {
    fn from(err: toml::de::Error) -> Self {
        GatewayError::Config(err.to_string())
    }
}
