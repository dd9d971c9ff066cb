//! Profile picture storage.
//!
//! Pictures are plain files in the upload directory, named
//! `<account id>-<uuid>.<ext>`. The profile only stores the filename.
//! Deleting a replaced picture happens outside any database transaction, so
//! it is best-effort: a failure is logged and leaves an orphaned file.

use std::path::{Path, PathBuf};

use z_social_core::{AccountId, SocialError};

/// URL prefix under which the upload directory is served.
pub const UPLOADS_PATH: &str = "/uploads";

/// Accepted picture extensions.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// An uploaded picture read fully into memory.
#[derive(Debug, Clone)]
pub struct PictureUpload {
    /// Client-supplied filename, used only for its extension.
    pub file_name: Option<String>,
    /// Client-supplied content type.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Local-directory picture store.
#[derive(Debug, Clone)]
pub struct PictureStorage {
    dir: PathBuf,
    max_bytes: usize,
}

impl PictureStorage {
    /// Create a store rooted at `dir` that rejects files over `max_bytes`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// The upload directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The size limit in bytes.
    #[must_use]
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Fail if `len` bytes would exceed the limit.
    ///
    /// # Errors
    ///
    /// Returns `SocialError::PayloadTooLarge`.
    pub fn check_size(&self, len: usize) -> Result<(), SocialError> {
        if len > self.max_bytes {
            return Err(SocialError::PayloadTooLarge {
                limit_bytes: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Write a new picture for `owner` and return its filename.
    ///
    /// Nothing is written if the upload is too large or of an unsupported type.
    ///
    /// # Errors
    ///
    /// Returns `SocialError::PayloadTooLarge`, `SocialError::InvalidUpload`, or
    /// `SocialError::Storage` if the file cannot be written.
    pub async fn save(&self, owner: AccountId, upload: &PictureUpload) -> Result<String, SocialError> {
        self.check_size(upload.bytes.len())?;
        if upload.bytes.is_empty() {
            return Err(SocialError::InvalidUpload("empty file".into()));
        }
        let ext = extension_for(upload.file_name.as_deref(), upload.content_type.as_deref())?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SocialError::Storage(format!("create upload dir: {e}")))?;

        let filename = format!("{owner}-{}.{ext}", uuid::Uuid::new_v4().simple());
        tokio::fs::write(self.dir.join(&filename), &upload.bytes)
            .await
            .map_err(|e| SocialError::Storage(format!("write picture: {e}")))?;

        tracing::debug!(account_id = %owner, filename = %filename, bytes = upload.bytes.len(), "Picture stored");

        Ok(filename)
    }

    /// Delete a stored picture, logging instead of failing.
    pub async fn remove(&self, filename: &str) {
        if !is_plain_filename(filename) {
            tracing::warn!(filename = %filename, "Refusing to delete picture outside upload dir");
            return;
        }

        match tokio::fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => tracing::debug!(filename = %filename, "Picture removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(filename = %filename, error = %e, "Failed to remove old picture");
            }
        }
    }
}

/// Public URL for a stored picture.
#[must_use]
pub fn public_url(filename: &str) -> String {
    format!("{UPLOADS_PATH}/{filename}")
}

/// Pick a file extension from the client filename, falling back to the content type.
///
/// # Errors
///
/// Returns `SocialError::InvalidUpload` if neither names an allowed image type.
pub fn extension_for(
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<&'static str, SocialError> {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let candidate = from_name.or_else(|| {
        content_type
            .and_then(|ct| ct.strip_prefix("image/"))
            .map(str::to_ascii_lowercase)
    });

    candidate
        .and_then(|ext| ALLOWED_EXTENSIONS.iter().copied().find(|allowed| *allowed == ext))
        .ok_or_else(|| {
            SocialError::InvalidUpload(format!(
                "picture must be one of: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}
