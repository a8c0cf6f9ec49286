//! Session verification port.
//!
//! Provider-agnostic: implementations exist for HS256 JWTs and for tests; an
//! OIDC introspection adapter would slot in without touching the gateway.

use async_trait::async_trait;

use crate::domain::{AuthError, Identity};

/// Resolves a session credential to an authenticated identity.
///
/// # Contract
///
/// Implementations must:
/// - validate the credential's signature and expiry;
/// - return `AuthError::InvalidToken` for malformed or unverifiable
///   credentials and `AuthError::TokenExpired` for expired ones;
/// - never panic on attacker-controlled input. The gateway treats every error
///   as an anonymous request.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verifies a raw credential (without any `Bearer ` prefix).
    async fn verify(&self, credential: &str) -> Result<Identity, AuthError>;
}
