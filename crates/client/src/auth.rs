//! Credential source consulted by the gateway.

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Supplies the bearer credential for the active identity.
///
/// The gateway asks the provider before every call and never caches the
/// returned token beyond that single call, so short-lived credentials are
/// always current. Acquisition may round-trip to an identity provider; only
/// the call that needs the token waits on it.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current bearer token, or `None` when no identity is signed in.
    async fn bearer_token(&self) -> Option<String>;

    /// Drop the local identity after the server reports the session stale.
    ///
    /// Invoked by the gateway exactly once per `SessionExpired`
    /// classification. The presentation layer reacts to the resulting error
    /// by returning to its unauthenticated landing state.
    async fn sign_out(&self);
}

/// Provider holding a fixed credential that is cleared on sign-out.
///
/// Covers CLI and test use. Interactive frontends implement
/// [`TokenProvider`] over their own identity state instead.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    token: RwLock<Option<String>>,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Provider with no identity; every gateway call fails `Unauthenticated`.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn sign_out(&self) {
        self.token.write().await.take();
    }
}
