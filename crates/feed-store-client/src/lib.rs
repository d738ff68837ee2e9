//! Rust clients for the feed backend services
//!
//! - [`StoreClient`]: document store (query, create, update, delete)
//! - [`AuthClient`]: password sign-in, issues ID tokens
//! - [`PostsClient`]: multipart post submission to the REST backend
//!
//! # Example
//!
//! ```rust,no_run
//! use feed_store_client::{AuthClient, AuthConfig, StoreClient, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = AuthClient::new(AuthConfig {
//!     base_url: "http://localhost:9099".into(),
//!     api_key: "dev-key".into(),
//!     timeout_secs: 30,
//! })?;
//! let session = auth.sign_in_with_password("ada@example.com", "secret").await?;
//!
//! let store = StoreClient::new(StoreConfig::default())?;
//! let clauses: Vec<serde_json::Value> = Vec::new();
//! let docs = store.run_query("posts", &clauses, &session.id_token).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod posts;
pub mod types;

// Re-export main types
pub use auth::AuthClient;
pub use client::StoreClient;
pub use error::{Result, StoreError};
pub use posts::PostsClient;
pub use types::*;
