//! On-disk storage for uploaded images.
//!
//! Files are written under a single directory with a random UUID name that
//! keeps the lowercased original extension, and are served back under
//! [`UPLOADS_URL_PREFIX`]. Retention and cleanup are not handled here.

use std::io;
use std::path::{Path, PathBuf};

use reupholster_core::simulation::ImageRef;

/// URL path the upload directory is mounted at.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Writes uploads to disk and maps between public URLs and local paths.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Generate a collision-free file name keeping the original extension.
    pub fn stored_name(original_name: &str) -> String {
        let id = uuid::Uuid::new_v4();
        match Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
        {
            Some(ext) => format!("{id}.{}", ext.to_ascii_lowercase()),
            None => id.to_string(),
        }
    }

    /// Persist `bytes` and return where they live and how they are served.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<ImageRef> {
        let name = Self::stored_name(original_name);
        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored upload");
        Ok(ImageRef {
            path,
            url: format!("{UPLOADS_URL_PREFIX}/{name}"),
        })
    }

    /// Map a `/uploads/<name>` URL back to its local file.
    ///
    /// Returns `None` for URLs outside the upload prefix or names that would
    /// escape the upload directory.
    pub fn resolve(&self, url: &str) -> Option<ImageRef> {
        let name = url.strip_prefix(UPLOADS_URL_PREFIX)?.strip_prefix('/')?;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return None;
        }
        Some(ImageRef {
            path: self.dir.join(name),
            url: url.to_string(),
        })
    }
}
