//! Identity types produced by session verification.
//!
//! These types have no provider dependencies. Any session mechanism (JWT,
//! opaque introspection) can populate them via the `SessionVerifier` port.

use thiserror::Error;

/// Authenticated identity extracted from a validated session credential.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Stable user identifier from the auth provider.
    pub id: String,

    /// Email address from the credential claims. This is the entitlement key.
    pub email: String,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Session verification failures.
///
/// Every variant is treated as "anonymous" by the gateway; the distinction
/// exists for logging, not for response shaping.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The credential is missing, malformed, or has an invalid signature.
    #[error("invalid session credential")]
    InvalidToken,

    /// The credential is well-formed but expired.
    #[error("session credential expired")]
    TokenExpired,

    /// The verification backend is unreachable (network, config).
    #[error("session verification unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_new_stores_fields() {
        let identity = Identity::new("user-123", "a@x.com");
        assert_eq!(identity.id, "user-123");
        assert_eq!(identity.email, "a@x.com");
    }

    #[test]
    fn auth_error_displays() {
        assert_eq!(format!("{}", AuthError::InvalidToken), "invalid session credential");
        assert_eq!(format!("{}", AuthError::TokenExpired), "session credential expired");
        assert_eq!(
            format!("{}", AuthError::service_unavailable("timeout")),
            "session verification unavailable: timeout"
        );
    }

    #[test]
    fn only_service_unavailable_is_transient() {
        assert!(AuthError::service_unavailable("down").is_transient());
        assert!(!AuthError::InvalidToken.is_transient());
        assert!(!AuthError::TokenExpired.is_transient());
    }
}
