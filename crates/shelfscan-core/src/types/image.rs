//! Image input representation.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Reference to an image handed to the recognition pipeline.
///
/// Sources are cheap to clone: in-memory content is backed by [`Bytes`].
/// Providers decide what they can consume: a remote provider may accept a
/// URL directly, while local engines require readable bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// Raw image content already in memory.
    Bytes {
        /// The image content.
        data: Bytes,
        /// MIME type of the content, when known.
        content_type: Option<String>,
    },
    /// A publicly reachable image URL.
    Url(Url),
}

impl ImageSource {
    /// Creates a source from a filesystem path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Creates a source from in-memory bytes.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Bytes {
            data: data.into(),
            content_type: None,
        }
    }

    /// Creates a source from a URL.
    pub fn from_url(url: Url) -> Self {
        Self::Url(url)
    }

    /// Sets the MIME type on an in-memory source.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        match self {
            Self::Bytes { data, .. } => Self::Bytes {
                data,
                content_type: Some(content_type.into()),
            },
            other => other,
        }
    }

    /// Best-effort MIME type for this source.
    ///
    /// Paths are sniffed by extension; URLs by the final path segment.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Path(path) => sniff_extension(path),
            Self::Bytes { content_type, .. } => content_type.as_deref(),
            Self::Url(url) => sniff_extension(Path::new(url.path())),
        }
    }

    /// Reads the image content into memory.
    ///
    /// URLs cannot be read here; providers that accept URLs pass them
    /// through to the backing service instead.
    pub async fn read_bytes(&self) -> Result<Bytes> {
        match self {
            Self::Path(path) => {
                let data = tokio::fs::read(path).await.map_err(|source| {
                    Error::from(source).with_message(format!("reading {}", path.display()))
                })?;
                Ok(Bytes::from(data))
            }
            Self::Bytes { data, .. } => Ok(data.clone()),
            Self::Url(url) => Err(Error::unsupported()
                .with_message(format!("cannot read bytes from URL source {url}"))),
        }
    }

    /// Returns the URL if this is a URL source.
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Self::Url(url) => Some(url),
            _ => None,
        }
    }
}

fn sniff_extension(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}
