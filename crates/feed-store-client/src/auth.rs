//! HTTP client for the authentication API

use crate::error::{Result, StoreError};
use crate::types::*;
use reqwest::Client;
use std::time::Duration;

/// Issues ID tokens for email/password accounts
#[derive(Debug, Clone)]
pub struct AuthClient {
    config: AuthConfig,
    client: Client,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(StoreError::Client("auth api_key must be non-empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Exchange an email and password for an ID token
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignInResponse> {
        let url = format!(
            "{}/v1/accounts:signInWithPassword",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            // Auth API errors carry a structured payload; fall back to raw text
            return Err(match serde_json::from_str::<AuthErrorResponse>(&body) {
                Ok(parsed) => StoreError::Auth {
                    code: if parsed.error.code == 0 { status } else { parsed.error.code },
                    message: parsed.error.message,
                },
                Err(_) => StoreError::Server {
                    status,
                    message: body,
                },
            });
        }

        let body: SignInResponse = response.json().await?;
        tracing::debug!(user = %body.local_id, "signed in");
        Ok(body)
    }
}
