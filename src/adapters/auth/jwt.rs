//! HS256 JWT implementation of the `SessionVerifier` port.
//!
//! The marketing site issues short-lived session tokens signed with a shared
//! secret; this adapter validates signature and expiry and maps the claims to
//! an [`Identity`]. Any decode failure is an authentication failure, never a
//! panic.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::domain::{AuthError, Identity};
use crate::ports::SessionVerifier;

/// Claims we read from a session token. Extra claims are ignored.
#[derive(Debug, Deserialize)]
struct SessionClaims {
    /// Stable user id.
    sub: String,
    /// Email address, the entitlement key.
    email: String,
    /// Expiry, seconds since the epoch. Required and checked by decode.
    #[allow(dead_code)]
    exp: i64,
}

/// Session verifier for HS256-signed JWTs.
pub struct JwtSessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionVerifier {
    /// Creates a verifier for tokens signed with `secret`.
    pub fn new(secret: &Secret<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionVerifier for JwtSessionVerifier {
    async fn verify(&self, credential: &str) -> Result<Identity, AuthError> {
        let data = decode::<SessionClaims>(credential, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;

        Ok(Identity::new(data.claims.sub, data.claims.email))
    }
}
