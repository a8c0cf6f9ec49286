//! Local filesystem content strategy.
//!
//! Development mode: bundles live as plain directories under a configured
//! root, one directory per slug. The whole tree beneath a slug directory is
//! read as text, with paths kept relative to the slug directory.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::domain::{BundleFile, ContentBundle, ContentError, Slug};

/// Reads bundles from a directory tree.
#[derive(Debug, Clone)]
pub struct LocalContentSource {
    root: PathBuf,
}

impl LocalContentSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Fetches the bundle for a slug.
    ///
    /// The slug has already passed charset validation, so joining it under
    /// the root cannot escape it.
    ///
    /// # Errors
    ///
    /// - `ContentError::NotFound` if the slug directory is absent or not a
    ///   directory;
    /// - `ContentError::Infrastructure` for any filesystem fault below it.
    pub async fn fetch_bundle(&self, slug: &Slug) -> Result<ContentBundle, ContentError> {
        let dir = self.root.join(slug.as_str());

        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(ContentError::NotFound),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContentError::NotFound)
            }
            Err(e) => return Err(ContentError::infrastructure(e.to_string())),
        }

        let mut files = Vec::new();
        let mut pending = vec![dir.clone()];
        while let Some(current) = pending.pop() {
            let mut entries = fs::read_dir(&current)
                .await
                .map_err(|e| ContentError::infrastructure(e.to_string()))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| ContentError::infrastructure(e.to_string()))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| ContentError::infrastructure(e.to_string()))?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    let path = entry.path();
                    let contents = fs::read_to_string(&path)
                        .await
                        .map_err(|e| ContentError::infrastructure(e.to_string()))?;
                    files.push(BundleFile {
                        path: relative_path(&dir, &path)?,
                        contents,
                    });
                }
            }
        }

        // Directory iteration order is platform-dependent; clients get a
        // stable ordering.
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(ContentBundle::new(files))
    }
}

/// Renders `path` relative to `base` with forward slashes on every platform.
fn relative_path(base: &Path, path: &Path) -> Result<String, ContentError> {
    let rel = path
        .strip_prefix(base)
        .map_err(|e| ContentError::infrastructure(e.to_string()))?;
    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}
