//! Mock session verifier for tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{AuthError, Identity};
use crate::ports::SessionVerifier;

/// Token-to-identity map; unknown tokens are invalid.
#[derive(Debug, Default)]
pub struct MockSessionVerifier {
    tokens: RwLock<HashMap<String, Identity>>,
    /// Optional error returned for every verification.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionVerifier {
    /// Creates a verifier that rejects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token that resolves to the given identity.
    pub fn with_identity(self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.write().unwrap().insert(token.into(), identity);
        self
    }

    /// Registers a token for a simple test identity with the given email.
    pub fn with_user(self, token: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();
        let identity = Identity::new(format!("user-{}", email), email);
        self.with_identity(token, identity)
    }

    /// Forces every verification to fail with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Registers a token at runtime.
    pub fn add_token(&self, token: impl Into<String>, identity: Identity) {
        self.tokens.write().unwrap().insert(token.into(), identity);
    }
}

#[async_trait]
impl SessionVerifier for MockSessionVerifier {
    async fn verify(&self, credential: &str) -> Result<Identity, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }
        self.tokens
            .read()
            .unwrap()
            .get(credential)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
