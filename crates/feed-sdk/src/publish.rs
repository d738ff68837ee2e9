//! Feed post publishing through the REST backend

use crate::auth::IdentityProvider;
use crate::error::{GatewayError, Result};
use feed_store_client::{NewPost, PostsClient};
use std::sync::Arc;

/// Name shown for authors without a display name
pub const DEFAULT_AUTHOR: &str = "User";

/// Publishes posts as the signed-in user
#[derive(Clone)]
pub struct FeedPublisher {
    client: PostsClient,
    identity: Arc<dyn IdentityProvider>,
}

impl FeedPublisher {
    pub fn new(client: PostsClient, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { client, identity }
    }

    /// Publish `text` as a new post
    ///
    /// Blank text is rejected; anything else is sent exactly as given.
    pub async fn publish(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(GatewayError::InvalidInput("post text is empty".into()));
        }

        let Some(identity) = self.identity.current_identity().await else {
            tracing::error!("User not authenticated. Cannot publish post.");
            return Err(GatewayError::AuthRequired);
        };
        let token = identity.bearer_token()?;

        let post = NewPost {
            description: text.to_string(),
            author_id: identity.uid.clone(),
            author: identity
                .display_name
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            author_avatar: identity.photo_url.clone().unwrap_or_default(),
        };

        self.client
            .create_post(token, &post)
            .await
            .map_err(|e| {
                tracing::error!("Post failed: {}", e);
                GatewayError::from(e)
            })
    }
}
