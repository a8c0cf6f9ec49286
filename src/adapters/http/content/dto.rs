//! Wire types for the content gateway.

use serde::{Deserialize, Serialize};

use crate::domain::ContentBundle;

/// One file of a served bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleFileDto {
    /// Path relative to the bundle root.
    pub name: String,
    /// File contents as text.
    pub code: String,
}

/// Success body for `GET /content/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleResponse {
    pub files: Vec<BundleFileDto>,
}

impl From<ContentBundle> for BundleResponse {
    fn from(bundle: ContentBundle) -> Self {
        BundleResponse {
            files: bundle
                .files
                .into_iter()
                .map(|f| BundleFileDto {
                    name: f.path,
                    code: f.contents,
                })
                .collect(),
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error body with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
