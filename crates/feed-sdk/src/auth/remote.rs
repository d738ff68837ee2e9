//! Password sign-in against the remote auth API

use super::{AuthSession, Identity};
use crate::error::Result;
use feed_store_client::{AuthClient, SignInResponse};

/// Signs users in remotely and publishes the result into a session
#[derive(Debug, Clone)]
pub struct RemoteSignIn {
    client: AuthClient,
    session: AuthSession,
}

impl RemoteSignIn {
    pub fn new(client: AuthClient, session: AuthSession) -> Self {
        Self { client, session }
    }

    /// Sign in with email and password
    ///
    /// On failure the session is marked signed out, so pending waiters
    /// resolve to no identity.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity> {
        match self.client.sign_in_with_password(email, password).await {
            Ok(response) => {
                let identity = identity_from(response);
                self.session.sign_in(identity.clone());
                Ok(identity)
            }
            Err(e) => {
                tracing::error!("Sign-in failed for {}: {}", email, e);
                self.session.sign_out();
                Err(e.into())
            }
        }
    }

    pub fn sign_out(&self) {
        self.session.sign_out();
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }
}

fn identity_from(response: SignInResponse) -> Identity {
    Identity {
        uid: response.local_id,
        display_name: response.display_name.filter(|name| !name.is_empty()),
        photo_url: response.photo_url.filter(|url| !url.is_empty()),
        id_token: Some(response.id_token),
    }
}
