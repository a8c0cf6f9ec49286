//! Payment webhook configuration
//!
//! The signing secret is optional at load time so a misconfigured deployment
//! still boots and serves content; deliveries against the unconfigured
//! webhook answer 500 and alert operators, which is deliberately distinct
//! from an invalid signature.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment webhook configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Shared HMAC secret for webhook signatures
    pub signing_secret: Option<Secret<String>>,

    /// When set, only events for this product are applied
    pub product_id: Option<String>,
}

impl WebhookConfig {
    /// Whether deliveries can be verified at all.
    pub fn is_configured(&self) -> bool {
        self.signing_secret.is_some()
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(secret) = &self.signing_secret {
            if secret.expose_secret().is_empty() {
                return Err(ValidationError::EmptySecret("WEBHOOK_SIGNING_SECRET"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_secret_is_valid_but_unconfigured() {
        let config = WebhookConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_configured());
    }

    #[test]
    fn present_secret_is_configured() {
        let config = WebhookConfig {
            signing_secret: Some(Secret::new("whsec_x".to_string())),
            product_id: None,
        };
        assert!(config.validate().is_ok());
        assert!(config.is_configured());
    }

    #[test]
    fn empty_secret_is_rejected() {
        let config = WebhookConfig {
            signing_secret: Some(Secret::new(String::new())),
            product_id: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptySecret(_))
        ));
    }
}
