//! Authenticated document gateway
//!
//! Every store access first resolves the current identity, then acts.
//! Writes are stamped with `createdAt`/`updatedAt` from the gateway's
//! clock; caller-supplied values for those fields are never trusted.

use crate::auth::{Identity, IdentityProvider};
use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::document::{AddResult, CollectionRef, DocumentRecord, Fields, QuerySpec, CREATED_AT, UPDATED_AT};
use crate::error::{GatewayError, Result};
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// What `fetch_many` does when nobody is signed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadPolicy {
    /// Log and return an empty result
    #[default]
    Empty,
    /// Fail with `AuthRequired`, like the write paths
    RequireIdentity,
}

/// Gateway over a document store and an identity source
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use feed_sdk::{AuthSession, CollectionRef, DocumentGateway, Identity, MemoryStore, QuerySpec};
///
/// # async fn example() -> feed_sdk::Result<()> {
/// let session = AuthSession::signed_in(Identity::new("u1"));
/// let gateway = DocumentGateway::new(Arc::new(MemoryStore::new()), Arc::new(session));
///
/// let posts = CollectionRef::new("posts")?;
/// let mut fields = feed_sdk::Fields::new();
/// fields.insert("text".into(), "hi".into());
/// let added = gateway.add_one(&posts, fields).await?;
///
/// let all = gateway.fetch_many(&posts, &QuerySpec::new()).await?;
/// assert_eq!(all[0].id, added.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DocumentGateway {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
    read_policy: ReadPolicy,
}

impl std::fmt::Debug for DocumentGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentGateway")
            .field("store", &self.store.name())
            .field("read_policy", &self.read_policy)
            .finish()
    }
}

impl DocumentGateway {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            identity,
            clock: Arc::new(SystemClock),
            read_policy: ReadPolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_read_policy(mut self, policy: ReadPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    /// Wait for the auth subsystem's current identity
    pub async fn resolve_identity(&self) -> Option<Identity> {
        self.identity.current_identity().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.resolve_identity().await.is_some()
    }

    /// Run `query` against `collection`
    ///
    /// Under [`ReadPolicy::Empty`] a signed-out caller gets an empty
    /// result instead of an error.
    pub async fn fetch_many(
        &self,
        collection: &CollectionRef,
        query: &QuerySpec,
    ) -> Result<Vec<DocumentRecord>> {
        let Some(actor) = self.resolve_identity().await else {
            return match self.read_policy {
                ReadPolicy::Empty => {
                    tracing::warn!("User not authenticated. Fetch from {} skipped.", collection);
                    Ok(Vec::new())
                }
                ReadPolicy::RequireIdentity => {
                    tracing::error!("User not authenticated. Cannot fetch from {}.", collection);
                    Err(GatewayError::AuthRequired)
                }
            };
        };

        self.store
            .query(&actor, collection, query)
            .await
            .inspect_err(|e| tracing::error!("Error fetching documents from {}: {}", collection, e))
    }

    /// Create a document stamped with equal creation and update times
    pub async fn add_one(&self, collection: &CollectionRef, mut fields: Fields) -> Result<AddResult> {
        let actor = self.require_identity("add document to", collection).await?;

        let now = Value::String(format_timestamp(self.clock.now()));
        fields.insert(CREATED_AT.into(), now.clone());
        fields.insert(UPDATED_AT.into(), now);

        let id = self
            .store
            .create(&actor, collection, fields)
            .await
            .inspect_err(|e| tracing::error!("Error adding document to {}: {}", collection, e))?;

        tracing::debug!("Added document {}/{}", collection, id);
        Ok(AddResult { id, success: true })
    }

    /// Merge `fields` into one document and refresh its update time
    pub async fn update_one(&self, collection: &CollectionRef, id: &str, mut fields: Fields) -> Result<()> {
        let actor = self.require_identity("update document in", collection).await?;

        fields.remove(CREATED_AT);
        fields.insert(
            UPDATED_AT.into(),
            Value::String(format_timestamp(self.clock.now())),
        );

        self.store
            .update(&actor, collection, id, fields)
            .await
            .inspect_err(|e| {
                tracing::error!("Error updating document {} in {}: {}", id, collection, e)
            })
    }

    /// Remove one document; a missing document is not an error
    pub async fn delete_one(&self, collection: &CollectionRef, id: &str) -> Result<()> {
        let actor = self.require_identity("delete document in", collection).await?;

        self.store
            .delete(&actor, collection, id)
            .await
            .inspect_err(|e| {
                tracing::error!("Error deleting document {} in {}: {}", id, collection, e)
            })
    }

    async fn require_identity(&self, action: &str, collection: &CollectionRef) -> Result<Identity> {
        match self.resolve_identity().await {
            Some(identity) => Ok(identity),
            None => {
                tracing::error!("User not authenticated. Cannot {} {}.", action, collection);
                Err(GatewayError::AuthRequired)
            }
        }
    }
}
