//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration (session token verification)
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret the marketing site signs session tokens with
    pub session_secret: Secret<String>,
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.session_secret.expose_secret().is_empty() {
            return Err(ValidationError::EmptySecret("AUTH_SESSION_SECRET"));
        }
        Ok(())
    }
}
