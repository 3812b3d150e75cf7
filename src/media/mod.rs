//! Media Store - directory-backed blob store for uploaded project files.
//!
//! Files are written under a single flat directory with generated,
//! collision-resistant names and addressed by a stable `/uploads/<name>`
//! reference usable for serving and deletion.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::Rng;

/// Route prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Per-file size cap.
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024; // 50MB

/// Maximum number of file parts accepted per request.
pub const MAX_MEDIA_FILES: usize = 10;

/// Accepted file extensions / content-type tokens.
pub const ALLOWED_MEDIA_TYPES: &[&str] =
    &["jpeg", "jpg", "png", "gif", "mp4", "mov", "avi", "webm"];

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid media reference: {0}")]
    InvalidReference(String),
}

/// A stored file: generated name plus the public reference path.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMedia {
    pub filename: String,
    pub url: String,
    pub size: usize,
}

/// Capability interface over the backing medium so local disk could be
/// swapped for an object store without touching the Project Service.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persists the bytes under a generated name; returns the stable reference.
    async fn put(&self, original_name: &str, bytes: &[u8]) -> Result<StoredMedia, MediaError>;

    /// Deletes the file behind a reference previously returned by `put`.
    async fn delete(&self, url: &str) -> Result<(), MediaError>;

    /// True if the backing directory is reachable (health reporting).
    async fn probe(&self) -> Result<(), MediaError>;
}

/// Lowercased extension of a filename, empty if there is none.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

/// Whether an uploaded file passes the media filter.
///
/// Both the filename extension and the declared content type must match the
/// whitelist; the content type is matched by token containment so that e.g.
/// "video/mp4" and "image/jpeg" pass without a full mime table.
pub fn is_allowed_media(filename: &str, content_type: &str) -> bool {
    let ext = file_extension(filename);
    if !ALLOWED_MEDIA_TYPES.contains(&ext.as_str()) {
        return false;
    }
    let content_type = content_type.to_lowercase();
    ALLOWED_MEDIA_TYPES.iter().any(|t| content_type.contains(t))
}

fn sanitize_filename(filename: &str) -> bool {
    // Reject path traversal and special characters
    !filename.is_empty()
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains('\0')
}

/// Filesystem-backed media store.
pub struct FsMediaStore {
    dir: PathBuf,
}

impl FsMediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the UPLOAD_DIR env var, defaulting to `uploads`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Unique name for a stored file: millisecond timestamp plus a random
    /// suffix, keeping the original extension. Concurrent requests cannot
    /// collide short of drawing the same suffix in the same millisecond.
    fn generate_filename(original_name: &str) -> String {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        let ext = file_extension(original_name);
        if ext.is_empty() {
            format!("media-{}-{}", timestamp, suffix)
        } else {
            format!("media-{}-{}.{}", timestamp, suffix, ext)
        }
    }

    /// Maps a public reference (or bare filename) back to the on-disk path.
    fn resolve(&self, url: &str) -> Result<PathBuf, MediaError> {
        let filename = url
            .strip_prefix(&format!("{}/", PUBLIC_PREFIX))
            .unwrap_or(url);
        if !sanitize_filename(filename) {
            return Err(MediaError::InvalidReference(url.to_string()));
        }
        Ok(self.dir.join(filename))
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn put(&self, original_name: &str, bytes: &[u8]) -> Result<StoredMedia, MediaError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = Self::generate_filename(original_name);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(filename = %filename, size = bytes.len(), "media file stored");

        Ok(StoredMedia {
            url: format!("{}/{}", PUBLIC_PREFIX, filename),
            filename,
            size: bytes.len(),
        })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        let path = self.resolve(url)?;
        tokio::fs::remove_file(&path).await?;
        tracing::info!(url = %url, "media file deleted");
        Ok(())
    }

    async fn probe(&self) -> Result<(), MediaError> {
        // The directory is created lazily on first put; absent is healthy.
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(MediaError::InvalidReference(format!(
                "{} is not a directory",
                self.dir.display()
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaError::Io(e)),
        }
    }
}
