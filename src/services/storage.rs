//! Profile image storage
//!
//! Local-disk object storage for the `profile-images` bucket. Each user has
//! one image at `{user_id}/profile.{ext}`; uploading a new image overwrites
//! or replaces it, and the previous file is removed best-effort.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

use crate::config::StorageConfig;

/// Bucket directory under the storage root
const BUCKET: &str = "profile-images";

/// Error types for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Rejected MIME type
    #[error("Invalid file type: {0}")]
    InvalidType(String),

    /// File exceeds the configured size limit
    #[error("File too large: {size} bytes (maximum {max})")]
    TooLarge { size: u64, max: u64 },

    /// Internal error
    #[error("Storage error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Disk-backed image storage for profile pictures
pub struct ImageStorage {
    config: Arc<StorageConfig>,
}

impl ImageStorage {
    /// Create a new image storage over the configured root directory
    pub fn new(config: Arc<StorageConfig>) -> Self {
        Self { config }
    }

    /// Root directory of the profile-images bucket
    pub fn bucket_root(&self) -> PathBuf {
        self.config.path.join(BUCKET)
    }

    /// Store a user's profile image, replacing any previous one.
    ///
    /// Validates the MIME type and size, writes the file at
    /// `{user_id}/profile.{ext}` and returns the public URL. A previous
    /// image with a different extension is deleted best-effort: a failed
    /// delete is logged and does not block the upload.
    pub async fn store_profile_image(
        &self,
        user_id: i64,
        content_type: &str,
        data: &[u8],
        previous_url: Option<&str>,
    ) -> Result<String, StorageError> {
        if !self.config.is_type_allowed(content_type) {
            return Err(StorageError::InvalidType(content_type.to_string()));
        }

        if data.len() as u64 > self.config.max_image_size {
            return Err(StorageError::TooLarge {
                size: data.len() as u64,
                max: self.config.max_image_size,
            });
        }

        if let Some(url) = previous_url {
            if let Err(e) = self.remove_by_url(url).await {
                tracing::warn!("Failed to delete previous profile image {}: {}", url, e);
            }
        }

        let ext = self.config.get_extension(content_type);
        let user_dir = self.bucket_root().join(user_id.to_string());
        fs::create_dir_all(&user_dir)
            .await
            .with_context(|| format!("Failed to create upload dir: {:?}", user_dir))?;

        let file_path = user_dir.join(format!("profile.{}", ext));
        fs::write(&file_path, data)
            .await
            .with_context(|| format!("Failed to save file: {:?}", file_path))?;

        Ok(format!("/uploads/{}/{}/profile.{}", BUCKET, user_id, ext))
    }

    /// Delete the object behind a public URL produced by this storage
    pub async fn remove_by_url(&self, url: &str) -> Result<()> {
        let relative = url
            .strip_prefix("/uploads/")
            .ok_or_else(|| anyhow::anyhow!("Not a storage URL: {}", url))?;

        // Keep deletes inside the storage root
        if relative.contains("..") {
            anyhow::bail!("Refusing path traversal in storage URL: {}", url);
        }

        let path = self.config.path.join(relative);
        if path.exists() {
            fs::remove_file(&path)
                .await
                .with_context(|| format!("Failed to delete file: {:?}", path))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage() -> (tempfile::TempDir, ImageStorage) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = StorageConfig {
            path: dir.path().to_path_buf(),
            max_image_size: 1024,
            allowed_types: vec!["image/png".to_string(), "image/jpeg".to_string()],
        };
        let storage = ImageStorage::new(Arc::new(config));
        (dir, storage)
    }

    #[tokio::test]
    async fn test_store_profile_image() {
        let (dir, storage) = test_storage();

        let url = storage
            .store_profile_image(7, "image/png", b"fake png bytes", None)
            .await
            .expect("Failed to store image");

        assert_eq!(url, "/uploads/profile-images/7/profile.png");
        assert!(dir.path().join("profile-images/7/profile.png").exists());
    }

    #[tokio::test]
    async fn test_rejects_disallowed_type() {
        let (_dir, storage) = test_storage();

        let result = storage
            .store_profile_image(7, "application/pdf", b"%PDF", None)
            .await;

        assert!(matches!(result, Err(StorageError::InvalidType(_))));
    }

    #[tokio::test]
    async fn test_rejects_oversized_file() {
        let (_dir, storage) = test_storage();
        let big = vec![0u8; 2048];

        let result = storage.store_profile_image(7, "image/png", &big, None).await;

        assert!(matches!(result, Err(StorageError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn test_replaces_previous_image_with_other_extension() {
        let (dir, storage) = test_storage();

        let old_url = storage
            .store_profile_image(7, "image/jpeg", b"jpeg bytes", None)
            .await
            .unwrap();
        assert!(dir.path().join("profile-images/7/profile.jpg").exists());

        let new_url = storage
            .store_profile_image(7, "image/png", b"png bytes", Some(&old_url))
            .await
            .unwrap();

        assert_eq!(new_url, "/uploads/profile-images/7/profile.png");
        assert!(!dir.path().join("profile-images/7/profile.jpg").exists());
        assert!(dir.path().join("profile-images/7/profile.png").exists());
    }

    #[tokio::test]
    async fn test_upload_survives_failed_delete_of_previous() {
        let (_dir, storage) = test_storage();

        // Previous URL pointing at nothing; delete is a no-op, upload proceeds
        let url = storage
            .store_profile_image(7, "image/png", b"bytes", Some("/uploads/profile-images/7/profile.gif"))
            .await
            .expect("Upload must not fail when the old object is gone");

        assert_eq!(url, "/uploads/profile-images/7/profile.png");
    }

    #[tokio::test]
    async fn test_remove_by_url_rejects_traversal() {
        let (_dir, storage) = test_storage();

        let result = storage.remove_by_url("/uploads/../etc/passwd").await;
        assert!(result.is_err());
    }
}
