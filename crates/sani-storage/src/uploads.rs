//! Upload store
//!
//! Uploaded files land in `uploads/` under a sanitized, timestamp-prefixed
//! name. Redacted output goes to `processed/` as `redacted_<name>`.

use crate::{Result, StorageError};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::macros::format_description;

/// A file written by [`UploadStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Name inside the upload directory
    pub name: String,
    pub path: PathBuf,
    /// BLAKE3 digest of the content, hex encoded
    pub digest: String,
    pub size_bytes: usize,
}

pub struct UploadStore {
    upload_dir: PathBuf,
    processed_dir: PathBuf,
}

impl UploadStore {
    /// Open the store, creating both directories if needed.
    pub fn open(upload_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Result<Self> {
        let upload_dir = upload_dir.into();
        let processed_dir = processed_dir.into();
        std::fs::create_dir_all(&upload_dir)?;
        std::fs::create_dir_all(&processed_dir)?;

        Ok(Self {
            upload_dir,
            processed_dir,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// Store `content` under a sanitized, timestamped version of `original_name`.
    pub async fn save(&self, original_name: &str, content: &[u8]) -> Result<StoredUpload> {
        let now = OffsetDateTime::now_utc();
        let stamp = now
            .format(format_description!("[year][month][day]_[hour][minute][second]"))
            .map_err(|e| StorageError::Other(e.into()))?;

        let name = format!("{}_{}", stamp, sanitize_filename(original_name));
        let path = self.upload_dir.join(&name);
        tokio::fs::write(&path, content).await?;

        let digest = blake3::hash(content).to_hex().to_string();

        tracing::info!(
            "Stored upload '{}' as '{}' ({} bytes, blake3 {})",
            original_name,
            name,
            content.len(),
            &digest[..12]
        );

        Ok(StoredUpload {
            name,
            path,
            digest,
            size_bytes: content.len(),
        })
    }

    /// Path of a stored upload. Rejects anything that is not a bare file name.
    pub fn resolve_upload(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(StorageError::InvalidFilename(name.to_string()));
        }

        let path = self.upload_dir.join(name);
        if !path.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        Ok(path)
    }

    /// Output path for the redacted version of upload `name`.
    pub fn processed_path(&self, name: &str) -> PathBuf {
        self.processed_dir.join(format!("redacted_{}", name))
    }
}

/// Reduce a client-supplied file name to a safe bare name.
///
/// Keeps the last path component, maps whitespace to `_`, drops everything
/// except ASCII alphanumerics, `.`, `_` and `-`, collapses runs of dots
/// and strips leading dots.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let mut cleaned = String::with_capacity(base.len());
    for c in base.chars() {
        let c = match c {
            c if c.is_whitespace() => '_',
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => c,
            _ => continue,
        };
        // Runs of dots collapse so the name never contains `..`
        if c == '.' && cleaned.ends_with('.') {
            continue;
        }
        cleaned.push(c);
    }

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
