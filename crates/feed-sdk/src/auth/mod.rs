//! Identity resolution
//!
//! The auth subsystem reports identity changes through an [`AuthSession`].
//! Until it has reported once the state is [`AuthState::Pending`], and
//! [`IdentityProvider::current_identity`] waits for that first report.

#[cfg(feature = "client")]
mod remote;

#[cfg(feature = "client")]
pub use remote::RemoteSignIn;

use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// An authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable unique user ID
    pub uid: String,
    pub display_name: Option<String>,
    /// Profile image URL
    pub photo_url: Option<String>,
    /// Bearer token issued by the auth subsystem
    #[serde(skip_serializing)]
    pub id_token: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            photo_url: None,
            id_token: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }

    /// Bearer token, or `AuthRequired` if none was issued
    pub fn bearer_token(&self) -> Result<&str> {
        self.id_token.as_deref().ok_or(GatewayError::AuthRequired)
    }
}

/// What the auth subsystem last reported
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No report yet
    #[default]
    Pending,
    SignedOut,
    SignedIn(Identity),
}

impl AuthState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthState::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Source of the current identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the current identity once the auth subsystem has reported
    ///
    /// Absence of a user is a normal outcome, not an error.
    async fn current_identity(&self) -> Option<Identity>;
}

/// Shared auth state with change notification
///
/// Clones observe and publish the same state.
#[derive(Debug, Clone)]
pub struct AuthSession {
    state: Arc<watch::Sender<AuthState>>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::pending()
    }
}

impl AuthSession {
    /// Session whose state has not been reported yet
    pub fn pending() -> Self {
        Self::with_state(AuthState::Pending)
    }

    pub fn signed_out() -> Self {
        Self::with_state(AuthState::SignedOut)
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self::with_state(AuthState::SignedIn(identity))
    }

    fn with_state(state: AuthState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn sign_in(&self, identity: Identity) {
        tracing::info!(uid = %identity.uid, "signed in");
        self.state.send_replace(AuthState::SignedIn(identity));
    }

    pub fn sign_out(&self) {
        tracing::info!("signed out");
        self.state.send_replace(AuthState::SignedOut);
    }

    /// Subscribe to identity changes
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Last reported state, without waiting
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// ID token of the signed-in user
    pub fn id_token(&self) -> Result<String> {
        match self.state.borrow().identity() {
            Some(identity) => identity.bearer_token().map(str::to_owned),
            None => Err(GatewayError::AuthRequired),
        }
    }
}

#[async_trait]
impl IdentityProvider for AuthSession {
    async fn current_identity(&self) -> Option<Identity> {
        let mut rx = self.state.subscribe();
        let identity = match rx.wait_for(|state| !matches!(state, AuthState::Pending)).await {
            Ok(state) => state.identity().cloned(),
            Err(_) => None,
        };
        identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signed_out_resolves_to_none() {
        let session = AuthSession::signed_out();
        assert_eq!(session.current_identity().await, None);
    }

    #[tokio::test]
    async fn test_signed_in_resolves_to_identity() {
        let session = AuthSession::signed_in(Identity::new("u1").with_display_name("Ada"));
        let identity = session.current_identity().await.unwrap();
        assert_eq!(identity.uid, "u1");
        assert_eq!(identity.display_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_pending_waits_for_first_report() {
        let session = AuthSession::pending();
        let waiter = {
            let session = session.clone();
            tokio::spawn(async move { session.current_identity().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        session.sign_in(Identity::new("u1"));
        let resolved = waiter.await.unwrap();
        assert_eq!(resolved.map(|i| i.uid), Some("u1".to_string()));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let session = AuthSession::signed_out();
        let mut rx = session.subscribe();

        session.sign_in(Identity::new("u2"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().identity().map(|i| i.uid.as_str()), Some("u2"));
    }

    #[test]
    fn test_id_token_requires_signed_in_user_with_token() {
        assert_eq!(AuthSession::signed_out().id_token(), Err(GatewayError::AuthRequired));
        assert_eq!(
            AuthSession::signed_in(Identity::new("u1")).id_token(),
            Err(GatewayError::AuthRequired)
        );
        assert_eq!(
            AuthSession::signed_in(Identity::new("u1").with_id_token("t")).id_token(),
            Ok("t".to_string())
        );
    }
}
