//! Content bundles: the files served for one slug.

use thiserror::Error;

/// One file inside a bundle, path relative to the bundle root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    pub path: String,
    pub contents: String,
}

/// The complete set of files for one slug. Immutable per retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBundle {
    pub files: Vec<BundleFile>,
}

impl ContentBundle {
    /// Creates a bundle from its files.
    pub fn new(files: Vec<BundleFile>) -> Self {
        Self { files }
    }

    /// Number of files in the bundle.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the bundle carries no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Content retrieval failures.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No bundle exists for the slug.
    #[error("no content bundle for slug")]
    NotFound,

    /// Retrieval failed mid-bundle (filesystem or upstream API fault).
    #[error("content retrieval failed: {0}")]
    Infrastructure(String),
}

impl ContentError {
    /// Creates an infrastructure error with a message.
    pub fn infrastructure(message: impl Into<String>) -> Self {
        ContentError::Infrastructure(message.into())
    }
}
