//! Content source adapters.
//!
//! The local/remote choice is a closed variant fixed at startup from
//! configuration. Handlers never branch on the environment; they hold a
//! `ContentSource` and call [`ContentSource::fetch_bundle`]. Both strategies
//! take a validated [`Slug`], so charset checking happens exactly once,
//! upstream of any path join or URL.

mod github;
mod local;

pub use github::GithubContentSource;
pub use local::LocalContentSource;

use secrecy::Secret;

use crate::domain::{ContentBundle, ContentError, Slug};

/// Where bundles come from: a local tree in development, a private
/// repository in production.
pub enum ContentSource {
    Local(LocalContentSource),
    Remote(GithubContentSource),
}

impl ContentSource {
    /// Creates the development strategy over a local content root.
    pub fn local(root: impl Into<std::path::PathBuf>) -> Self {
        ContentSource::Local(LocalContentSource::new(root))
    }

    /// Creates the production strategy over a private repository.
    pub fn remote(repo: impl Into<String>, token: Secret<String>) -> Self {
        ContentSource::Remote(GithubContentSource::new(repo, token))
    }

    /// True for the local development strategy, which also disables the
    /// gateway's identity and entitlement checks.
    pub fn is_local(&self) -> bool {
        matches!(self, ContentSource::Local(_))
    }

    /// Fetches the bundle for a slug from whichever strategy is configured.
    pub async fn fetch_bundle(&self, slug: &Slug) -> Result<ContentBundle, ContentError> {
        match self {
            ContentSource::Local(source) => source.fetch_bundle(slug).await,
            ContentSource::Remote(source) => source.fetch_bundle(slug).await,
        }
    }
}
