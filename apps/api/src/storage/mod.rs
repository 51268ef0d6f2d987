//! Blob storage for uploaded résumé files.
//!
//! Files live under the `files/` namespace, addressed by a generated opaque
//! name. The uploader's filename is kept only on the employee row.
//!
//! `AppState` holds an `Arc<dyn BlobStore>`, chosen at startup from config.

pub mod local;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;

pub use local::LocalBlobStore;
pub use s3::S3BlobStore;

/// Logical directory every résumé blob is stored under.
pub const FILES_NAMESPACE: &str = "files";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A blob read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub content_type: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError>;

    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// `Ok(None)` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<StoredBlob>, AppError>;
}

/// Full blob key for a stored filename.
pub fn file_key(stored_filename: &str) -> String {
    format!("{FILES_NAMESPACE}/{stored_filename}")
}

/// Generates a fresh opaque filename, keeping the original extension when it
/// is a plain alphanumeric suffix (`CV Final.PDF` → `3f2a…9c.pdf`).
pub fn generate_stored_filename(original_filename: &str) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match extension_of(original_filename) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// Lowercased extension of `filename`, if it is non-empty and alphanumeric.
pub fn extension_of(filename: &str) -> Option<String> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Content type for a stored upload: guessed from the filename, then the
/// type the client declared, then `application/octet-stream`.
pub fn content_type_for(filename: &str, declared: Option<&str>) -> String {
    mime_guess::from_path(filename)
        .first_raw()
        .map(str::to_string)
        .or_else(|| declared.filter(|d| !d.is_empty()).map(str::to_string))
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}
