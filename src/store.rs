//! Boundaries to the persistence service and the binary object store.
//!
//! DESIGN
//! ======
//! Both collaborators are async traits so hosts can plug in their own
//! backends and tests can mock them. `FileSnapshotStore` is the local
//! backend: one pretty-printed JSON file per share id.
//!
//! ERROR HANDLING
//! ==============
//! Upload failures never block editing. `upload_or_embed` falls back to a
//! `data:` URL of the same bytes so the image still previews in-session.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{info, warn};
use uuid::Uuid;

use crate::doc::ImageSource;
use crate::error::ErrorCode;
use crate::snapshot::SceneSnapshot;

/// Opaque key a saved snapshot is shared under.
pub type ShareId = Uuid;

// =============================================================================
// SNAPSHOTS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot not found: {0}")]
    NotFound(ShareId),
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot json invalid: {0}")]
    Json(#[from] serde_json::Error),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_SNAPSHOT_NOT_FOUND",
            Self::Io(_) => "E_SNAPSHOT_IO",
            Self::Json(_) => "E_SNAPSHOT_JSON",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Persistence service for scene snapshots.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist `snapshot` and return the id it can be loaded by.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend write fails.
    async fn save(&self, snapshot: &SceneSnapshot) -> Result<ShareId, StoreError>;

    /// Load the snapshot saved under `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or a read/parse error.
    async fn load(&self, id: ShareId) -> Result<SceneSnapshot, StoreError>;
}

/// Snapshot store backed by a directory of `<share id>.json` files.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: ShareId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[async_trait::async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &SceneSnapshot) -> Result<ShareId, StoreError> {
        let id = Uuid::new_v4();
        let json = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(id), json).await?;
        info!(%id, texts = snapshot.texts.len(), "snapshot saved");
        Ok(id)
    }

    async fn load(&self, id: ShareId) -> Result<SceneSnapshot, StoreError> {
        let bytes = match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

// =============================================================================
// IMAGE UPLOADS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("object store unavailable: {0}")]
    Unavailable(String),
}

impl ErrorCode for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "E_UPLOAD_REJECTED",
            Self::Unavailable(_) => "E_UPLOAD_UNAVAILABLE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Binary object store for uploaded image payloads.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `bytes` and return a stable URL for them.
    ///
    /// # Errors
    ///
    /// Returns an [`UploadError`] if the store refuses or can't be reached.
    async fn upload(&self, bytes: &[u8], mime_type: &str) -> Result<String, UploadError>;
}

/// `data:` URL source for `bytes`.
#[must_use]
pub fn embed(bytes: &[u8], mime_type: &str) -> ImageSource {
    ImageSource::Embedded { data_url: format!("data:{mime_type};base64,{}", STANDARD.encode(bytes)) }
}

/// Upload `bytes`; on failure fall back to an embedded copy.
pub async fn upload_or_embed<O: ObjectStore + ?Sized>(store: &O, bytes: &[u8], mime_type: &str) -> ImageSource {
    match store.upload(bytes, mime_type).await {
        Ok(url) => {
            info!(%url, bytes = bytes.len(), "image uploaded");
            ImageSource::Remote { url }
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "image upload failed; embedding locally");
            embed(bytes, mime_type)
        }
    }
}
