//! Process-wide service handles
//!
//! Built once at startup from [`FeedConfig`] and handed to whatever needs
//! a gateway. Nothing here is global; tests build their own.

use crate::auth::AuthSession;
use crate::config::{FeedConfig, StoreBackend};
use crate::error::{GatewayError, Result};
use crate::gateway::DocumentGateway;
use crate::guard::ExecutionContext;
use crate::store::{DocumentStore, MemoryStore};
use std::sync::Arc;

#[cfg(feature = "client")]
use crate::auth::RemoteSignIn;
#[cfg(feature = "client")]
use crate::publish::FeedPublisher;
#[cfg(feature = "client")]
use feed_store_client::{AuthClient, AuthConfig, PostsClient, PostsConfig};

/// The store, session and remote clients shared by one process
pub struct Backend {
    environment: ExecutionContext,
    config: FeedConfig,
    store: Arc<dyn DocumentStore>,
    session: AuthSession,
    #[cfg(feature = "client")]
    sign_in: Option<RemoteSignIn>,
    #[cfg(feature = "client")]
    posts: Option<PostsClient>,
}

impl Backend {
    /// Initialize every configured service
    ///
    /// A remote store that cannot be set up is replaced by a
    /// [`MemoryStore`] in development and is an error in production.
    /// The session starts signed out.
    pub fn connect(config: FeedConfig) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Remote => match remote_store(&config) {
                Ok(store) => store,
                Err(e) if config.environment.is_development() => {
                    tracing::warn!("Remote store initialization failed ({}), using in-memory store", e);
                    Arc::new(MemoryStore::new())
                }
                Err(e) => {
                    tracing::error!("Remote store initialization failed: {}", e);
                    return Err(GatewayError::StoreUnavailable(e.to_string()));
                }
            },
        };

        #[cfg_attr(not(feature = "client"), allow(unused_mut))]
        let mut backend = Self::with_store(config, store, AuthSession::signed_out());

        #[cfg(feature = "client")]
        {
            if let Some(ref auth) = backend.config.auth {
                let client = AuthClient::new(AuthConfig {
                    base_url: auth.base_url.clone(),
                    api_key: auth.api_key.clone(),
                    timeout_secs: auth.timeout_secs,
                })
                .map_err(|e| GatewayError::Config(e.to_string()))?;
                backend.sign_in = Some(RemoteSignIn::new(client, backend.session.clone()));
            }

            if let Some(ref posts) = backend.config.posts {
                let client = PostsClient::new(PostsConfig {
                    base_url: posts.base_url.clone(),
                    timeout_secs: posts.timeout_secs,
                })
                .map_err(|e| GatewayError::Config(e.to_string()))?;
                backend.posts = Some(client);
            }
        }

        tracing::info!(
            "Feed backend initialized (store: {}, environment: {})",
            backend.store.name(),
            backend.environment
        );
        Ok(backend)
    }

    /// Assemble a backend around an existing store and session
    pub fn with_store(config: FeedConfig, store: Arc<dyn DocumentStore>, session: AuthSession) -> Self {
        Self {
            environment: config.environment,
            config,
            store,
            session,
            #[cfg(feature = "client")]
            sign_in: None,
            #[cfg(feature = "client")]
            posts: None,
        }
    }

    /// Gateway over this backend's store and session
    pub fn gateway(&self) -> DocumentGateway {
        DocumentGateway::new(self.store.clone(), Arc::new(self.session.clone()))
            .with_read_policy(self.config.read_policy)
    }

    pub fn environment(&self) -> ExecutionContext {
        self.environment
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.store.clone()
    }

    /// Remote password sign-in, if an `[auth]` section is configured
    #[cfg(feature = "client")]
    pub fn remote_sign_in(&self) -> Option<&RemoteSignIn> {
        self.sign_in.as_ref()
    }

    /// Post publisher, if a `[posts]` section is configured
    #[cfg(feature = "client")]
    pub fn publisher(&self) -> Option<FeedPublisher> {
        self.posts
            .as_ref()
            .map(|client| FeedPublisher::new(client.clone(), Arc::new(self.session.clone())))
    }
}

#[cfg(feature = "client")]
fn remote_store(config: &FeedConfig) -> Result<Arc<dyn DocumentStore>> {
    use crate::store::RemoteStore;
    use feed_store_client::{StoreClient, StoreConfig};

    config.validate()?;
    let client = StoreClient::new(StoreConfig {
        base_url: config.store.base_url.clone().unwrap_or_default(),
        project_id: config.store.project_id.clone().unwrap_or_default(),
        api_key: config.store.api_key.clone(),
        timeout_secs: config.store.timeout_secs,
    })?;
    Ok(Arc::new(RemoteStore::new(client)))
}

#[cfg(not(feature = "client"))]
fn remote_store(_config: &FeedConfig) -> Result<Arc<dyn DocumentStore>> {
    Err(GatewayError::StoreUnavailable(
        "remote store requires the `client` feature".into(),
    ))
}
