//! Private GitHub repository content strategy.
//!
//! Production mode: bundles live under `stacks/{slug}` in a private repo and
//! are read through the contents API with a server-side token. The directory
//! listing may be served from a short-lived in-process cache; file contents
//! are always fetched fresh, concurrently, and a single file failure fails
//! the whole bundle.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::future::try_join_all;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::domain::{BundleFile, ContentBundle, ContentError, Slug};

/// Directory listings older than this are refetched.
const LISTING_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Repository path prefix under which bundles live.
const STACKS_PREFIX: &str = "stacks";

/// One entry from a contents-API directory listing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
struct RepoEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// A file payload from the contents API.
#[derive(Debug, Deserialize)]
struct RepoFile {
    content: String,
    encoding: String,
}

struct CachedListing {
    fetched_at: Instant,
    entries: Vec<RepoEntry>,
}

/// Reads bundles from a private repository via the GitHub contents API.
pub struct GithubContentSource {
    repo: String,
    token: Secret<String>,
    api_base: String,
    client: reqwest::Client,
    listing_cache: Mutex<HashMap<String, CachedListing>>,
}

impl GithubContentSource {
    /// Creates a source for `repo` (`owner/name`) authenticated by `token`.
    pub fn new(repo: impl Into<String>, token: Secret<String>) -> Self {
        Self {
            repo: repo.into(),
            token,
            api_base: "https://api.github.com".to_string(),
            client: reqwest::Client::new(),
            listing_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Fetches the bundle for a slug.
    ///
    /// # Errors
    ///
    /// - `ContentError::NotFound` if the listing call fails or returns a
    ///   non-success status;
    /// - `ContentError::Infrastructure` if any individual file fetch fails
    ///   (no partial bundles).
    pub async fn fetch_bundle(&self, slug: &Slug) -> Result<ContentBundle, ContentError> {
        let entries = self.list_dir(slug).await?;

        let fetches = entries
            .iter()
            .filter(|entry| entry.kind == "file")
            .map(|entry| self.fetch_file(entry));
        let mut files = try_join_all(fetches).await?;

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(ContentBundle::new(files))
    }

    /// Lists `stacks/{slug}`, serving from the TTL cache when fresh.
    async fn list_dir(&self, slug: &Slug) -> Result<Vec<RepoEntry>, ContentError> {
        if let Some(entries) = self.cached_listing(slug.as_str()) {
            return Ok(entries);
        }

        let url = format!(
            "{}/repos/{}/contents/{}/{}",
            self.api_base, self.repo, STACKS_PREFIX, slug
        );
        let response = self
            .request(&url)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(slug = %slug, error = %e, "bundle listing request failed");
                ContentError::NotFound
            })?;
        if !response.status().is_success() {
            tracing::debug!(slug = %slug, status = %response.status(), "bundle listing not found");
            return Err(ContentError::NotFound);
        }

        let entries: Vec<RepoEntry> = response
            .json()
            .await
            .map_err(|e| ContentError::infrastructure(e.to_string()))?;

        self.store_listing(slug.as_str(), entries.clone());
        Ok(entries)
    }

    /// Fetches and decodes one file from the repository.
    async fn fetch_file(&self, entry: &RepoEntry) -> Result<BundleFile, ContentError> {
        let url = format!("{}/repos/{}/contents/{}", self.api_base, self.repo, entry.path);
        let response = self
            .request(&url)
            .send()
            .await
            .map_err(|e| ContentError::infrastructure(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ContentError::infrastructure(format!(
                "file fetch for {} returned {}",
                entry.path,
                response.status()
            )));
        }

        let file: RepoFile = response
            .json()
            .await
            .map_err(|e| ContentError::infrastructure(e.to_string()))?;
        let contents = decode_transport(&file.content, &file.encoding)?;

        Ok(BundleFile {
            path: entry.name.clone(),
            contents,
        })
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            // GitHub rejects requests without a User-Agent.
            .header("User-Agent", "stackgate")
    }

    fn cached_listing(&self, slug: &str) -> Option<Vec<RepoEntry>> {
        let cache = self.listing_cache.lock().unwrap();
        cache
            .get(slug)
            .filter(|cached| cached.fetched_at.elapsed() < LISTING_CACHE_TTL)
            .map(|cached| cached.entries.clone())
    }

    fn store_listing(&self, slug: &str, entries: Vec<RepoEntry>) {
        self.listing_cache.lock().unwrap().insert(
            slug.to_string(),
            CachedListing {
                fetched_at: Instant::now(),
                entries,
            },
        );
    }
}

/// Decodes the contents-API transport encoding (base64 with line breaks).
fn decode_transport(content: &str, encoding: &str) -> Result<String, ContentError> {
    if encoding != "base64" {
        return Err(ContentError::infrastructure(format!(
            "unexpected transport encoding: {}",
            encoding
        )));
    }
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|e| ContentError::infrastructure(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ContentError::infrastructure(e.to_string()))
}
