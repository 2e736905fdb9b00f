//! Converts stored image files into embedded payloads for provider requests.
//!
//! An [`EmbeddedImage`] carries a declared media type plus the base64
//! encoded file bytes, and renders as a `data:` URL for JSON bodies.

use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// An image encoded as inline data, ready to be placed in a JSON request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Full media type, e.g. `image/jpeg`.
    pub media_type: String,
    /// Standard (padded) base64 of the raw file bytes.
    pub payload: String,
}

impl EmbeddedImage {
    /// Render as `data:<media_type>;base64,<payload>`.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.payload)
    }
}

/// A local image could not be read or labelled.
#[derive(Debug, thiserror::Error)]
#[error("Failed to read image {}: {source}", path.display())]
pub struct ImageReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Infer the media type from the file extension.
///
/// Matching is case-insensitive and `jpg` is normalised to the canonical
/// `jpeg` subtype. Returns `None` when the path has no usable extension.
pub fn media_type_for_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if ext.is_empty() {
        return None;
    }
    let subtype = if ext == "jpg" { "jpeg".to_string() } else { ext };
    Some(format!("image/{subtype}"))
}

/// Read the file at `path` and encode it as an [`EmbeddedImage`].
pub async fn encode(path: &Path) -> Result<EmbeddedImage, ImageReadError> {
    let media_type = media_type_for_path(path).ok_or_else(|| ImageReadError {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "file has no image extension"),
    })?;

    let bytes = tokio::fs::read(path).await.map_err(|source| ImageReadError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(EmbeddedImage {
        media_type,
        payload: STANDARD.encode(bytes),
    })
}
