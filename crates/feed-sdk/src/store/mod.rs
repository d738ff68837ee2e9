//! Document store backends
//!
//! The gateway talks to a [`DocumentStore`]; which one is chosen once at
//! startup:
//! - [`MemoryStore`]: in-process, for development and tests
//! - [`RemoteStore`]: the hosted document store over HTTP

mod memory;
#[cfg(feature = "client")]
mod remote;

pub use memory::MemoryStore;
#[cfg(feature = "client")]
pub use remote::RemoteStore;

use crate::auth::Identity;
use crate::document::{CollectionRef, DocumentRecord, Fields, QuerySpec};
use crate::error::Result;
use async_trait::async_trait;

/// Query/create/update/delete access to a document store
///
/// Every call receives the identity it is performed for.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Every document in `collection` matching `query`
    async fn query(
        &self,
        actor: &Identity,
        collection: &CollectionRef,
        query: &QuerySpec,
    ) -> Result<Vec<DocumentRecord>>;

    /// Create a document, returning its new ID
    async fn create(&self, actor: &Identity, collection: &CollectionRef, fields: Fields) -> Result<String>;

    /// Merge `fields` into an existing document
    async fn update(
        &self,
        actor: &Identity,
        collection: &CollectionRef,
        id: &str,
        fields: Fields,
    ) -> Result<()>;

    /// Remove a document; removing a missing document succeeds
    async fn delete(&self, actor: &Identity, collection: &CollectionRef, id: &str) -> Result<()>;
}
