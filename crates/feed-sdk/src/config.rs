//! Feed client configuration
//!
//! Loaded from a TOML file; every section is optional.
//!
//! ```toml
//! environment = "development"
//! read_policy = "empty"
//!
//! [store]
//! backend = "remote"
//! base_url = "https://store.example.com"
//! project_id = "g-network-community"
//!
//! [auth]
//! base_url = "https://auth.example.com"
//! api_key = "..."
//!
//! [posts]
//! base_url = "http://localhost:5000"
//! ```

use crate::error::{GatewayError, Result};
use crate::gateway::ReadPolicy;
use crate::guard::ExecutionContext;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Governs fallback substitution and startup fallbacks
    #[serde(default)]
    pub environment: ExecutionContext,

    /// Behaviour of reads without a signed-in user
    #[serde(default)]
    pub read_policy: ReadPolicy,

    #[serde(default)]
    pub store: StoreSection,

    /// Remote sign-in, absent for local-only setups
    #[serde(default)]
    pub auth: Option<AuthSection>,

    /// Posts REST backend
    #[serde(default)]
    pub posts: Option<PostsSection>,
}

/// Which document store implementation to start with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            base_url: None,
            project_id: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSection {
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsSection {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl FeedConfig {
    /// Load from a TOML file, or defaults if the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check that a remote store has its connection settings
    pub fn validate(&self) -> Result<()> {
        if self.store.backend == StoreBackend::Remote {
            if self.store.base_url.as_deref().map_or(true, |url| url.trim().is_empty()) {
                return Err(GatewayError::Config("store.base_url is required for the remote backend".into()));
            }
            if self.store.project_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
                return Err(GatewayError::Config("store.project_id is required for the remote backend".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FeedConfig::from_toml_str("").unwrap();
        assert_eq!(config.environment, ExecutionContext::Production);
        assert_eq!(config.read_policy, ReadPolicy::Empty);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.timeout_secs, 30);
        assert!(config.auth.is_none());
        assert!(config.posts.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = FeedConfig::from_toml_str(
            r#"
environment = "development"
read_policy = "require-identity"

[store]
backend = "remote"
base_url = "https://store.example.com"
project_id = "g-network-community"
timeout_secs = 10

[auth]
base_url = "https://auth.example.com"
api_key = "key-1"

[posts]
base_url = "http://localhost:5000"
"#,
        )
        .unwrap();

        assert_eq!(config.environment, ExecutionContext::Development);
        assert_eq!(config.read_policy, ReadPolicy::RequireIdentity);
        assert_eq!(config.store.backend, StoreBackend::Remote);
        assert_eq!(config.store.timeout_secs, 10);
        assert_eq!(config.auth.unwrap().timeout_secs, 30);
        assert_eq!(config.posts.unwrap().base_url, "http://localhost:5000");
    }

    #[test]
    fn test_remote_backend_requires_url() {
        let config = FeedConfig::from_toml_str("[store]\nbackend = \"remote\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        assert!(FeedConfig::from_toml_str("environment = \"staging\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FeedConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }
}
