//! Hosted document store over HTTP

use super::DocumentStore;
use crate::auth::Identity;
use crate::document::{CollectionRef, DocumentRecord, Fields, QuerySpec};
use crate::error::Result;
use async_trait::async_trait;
use feed_store_client::StoreClient;

/// [`DocumentStore`] backed by the remote store API
///
/// Requests are authorized with the acting identity's ID token; an
/// identity without a token fails with `AuthRequired`.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: StoreClient,
}

impl RemoteStore {
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }
}

#[async_trait]
impl DocumentStore for RemoteStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn query(
        &self,
        actor: &Identity,
        collection: &CollectionRef,
        query: &QuerySpec,
    ) -> Result<Vec<DocumentRecord>> {
        let token = actor.bearer_token()?;
        let documents = self
            .client
            .run_query(collection.as_str(), query.clauses(), token)
            .await?;
        Ok(documents
            .into_iter()
            .map(|doc| DocumentRecord::new(doc.id, doc.fields))
            .collect())
    }

    async fn create(&self, actor: &Identity, collection: &CollectionRef, fields: Fields) -> Result<String> {
        let token = actor.bearer_token()?;
        Ok(self
            .client
            .create_document(collection.as_str(), &fields, token)
            .await?)
    }

    async fn update(
        &self,
        actor: &Identity,
        collection: &CollectionRef,
        id: &str,
        fields: Fields,
    ) -> Result<()> {
        let token = actor.bearer_token()?;
        Ok(self
            .client
            .update_document(collection.as_str(), id, &fields, token)
            .await?)
    }

    async fn delete(&self, actor: &Identity, collection: &CollectionRef, id: &str) -> Result<()> {
        let token = actor.bearer_token()?;
        let existed = self
            .client
            .delete_document(collection.as_str(), id, token)
            .await?;
        if !existed {
            tracing::debug!("Delete of missing document {}/{} ignored", collection, id);
        }
        Ok(())
    }
}
