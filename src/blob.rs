//! Filesystem blob store for uploaded documents, signature images, and
//! generated PDFs.
//!
//! Objects live under a single root directory and are addressed by a
//! relative path like `TP_001/id_copy_1724800000000.pdf`. Stored objects
//! are served read-only under `/files/` by the API router; the "public
//! address" returned by [`BlobStore::put`] is that URL path.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// URL prefix under which the blob root is served.
pub const PUBLIC_PREFIX: &str = "/files";

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Invalid blob path: {0}")]
    InvalidPath(String),

    #[error("Blob I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores bytes at the given relative path and returns the public
    /// address. Parent directories are created; an existing object at the
    /// same path is overwritten.
    pub fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<String, BlobError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, bytes)?;
        tracing::debug!(path, content_type, size = bytes.len(), "Stored blob");
        Ok(self.public_url(path))
    }

    /// Public address for a stored path. Does not check existence.
    pub fn public_url(&self, path: &str) -> String {
        format!("{PUBLIC_PREFIX}/{path}")
    }

    /// Resolves a relative object path under the root, rejecting absolute
    /// paths and parent-directory traversal.
    fn resolve(&self, path: &str) -> Result<PathBuf, BlobError> {
        let rel = Path::new(path);
        if path.is_empty()
            || rel.components().any(|c| {
                !matches!(c, Component::Normal(_))
            })
        {
            return Err(BlobError::InvalidPath(path.into()));
        }
        Ok(self.root.join(rel))
    }
}

/// Builds the storage path for an object belonging to a policy:
/// `{policy_key}/{stem}_{timestamp}.{ext}`. The timestamp exists only in
/// the storage path, never in document content.
pub fn timestamped_path(policy_key: &str, stem: &str, ext: &str) -> String {
    let ts = chrono::Utc::now().timestamp_millis();
    format!("{policy_key}/{stem}_{ts}.{ext}")
}
