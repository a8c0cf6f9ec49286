//! Slug value object for naming content bundles.
//!
//! A slug is the only accepted identifier for a content bundle. Construction
//! validates the charset, so any code holding a `Slug` can safely join it into
//! filesystem paths or repository URLs. This is the single defense against
//! path traversal; neither content strategy re-validates.

use thiserror::Error;

/// Validated bundle identifier matching `^[a-z0-9-]+$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

/// Rejection for slugs outside the allowed charset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("slug must be non-empty and contain only lowercase letters, digits, and hyphens")]
pub struct InvalidSlug;

impl Slug {
    /// Parses a raw path segment into a `Slug`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlug` if the input is empty or contains any character
    /// outside `[a-z0-9-]`.
    pub fn parse(raw: &str) -> Result<Self, InvalidSlug> {
        if raw.is_empty() {
            return Err(InvalidSlug);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(InvalidSlug);
        }
        Ok(Slug(raw.to_string()))
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
