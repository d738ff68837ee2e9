//! HTTP client for the posts REST backend

use crate::error::{Result, StoreError};
use crate::types::*;
use reqwest::{multipart::Form, Client};
use std::time::Duration;

/// Submits feed posts to the REST backend
///
/// The backend expects a multipart form, authorized with the author's
/// bearer token.
#[derive(Debug, Clone)]
pub struct PostsClient {
    config: PostsConfig,
    client: Client,
}

impl PostsClient {
    pub fn new(config: PostsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a post
    pub async fn create_post(&self, token: &str, post: &NewPost) -> Result<()> {
        let url = format!("{}/api/posts", self.config.base_url.trim_end_matches('/'));

        let form = Form::new()
            .text("description", post.description.clone())
            .text("authorId", post.author_id.clone())
            .text("author", post.author.clone())
            .text("authorAvatar", post.author_avatar.clone());

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Server {
                status,
                message: body,
            });
        }

        Ok(())
    }
}
