//! Content source configuration
//!
//! Presence of `local_root` selects the local development strategy (and
//! disables the gateway's entitlement checks); its absence selects the
//! private-repository strategy, which requires `repo` and `repo_token`.
//! The choice is resolved once at startup, never re-read per request.

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Content source configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Local directory of bundles; enables the development strategy
    pub local_root: Option<PathBuf>,

    /// Private repository in owner/name form
    pub repo: Option<String>,

    /// Token with read access to the private repository
    pub repo_token: Option<Secret<String>>,
}

/// The strategy resolved from a validated configuration.
pub enum ContentStrategy<'a> {
    Local(&'a Path),
    Remote {
        repo: &'a str,
        token: &'a Secret<String>,
    },
}

impl ContentConfig {
    /// Whether the local development strategy is selected.
    pub fn is_local(&self) -> bool {
        self.local_root.is_some()
    }

    /// Resolves the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ContentConfig::validate`]; a validated
    /// configuration always resolves.
    pub fn strategy(&self) -> Result<ContentStrategy<'_>, ValidationError> {
        if let Some(root) = &self.local_root {
            return Ok(ContentStrategy::Local(root));
        }
        let repo = self
            .repo
            .as_deref()
            .ok_or(ValidationError::MissingRequired("CONTENT_REPO"))?;
        if repo.split('/').filter(|part| !part.is_empty()).count() != 2 {
            return Err(ValidationError::InvalidRepo);
        }
        let token = self
            .repo_token
            .as_ref()
            .ok_or(ValidationError::MissingRequired("CONTENT_REPO_TOKEN"))?;
        if token.expose_secret().is_empty() {
            return Err(ValidationError::EmptySecret("CONTENT_REPO_TOKEN"));
        }
        Ok(ContentStrategy::Remote { repo, token })
    }

    /// Validate content configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.strategy().map(|_| ())
    }
}
