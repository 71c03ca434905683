//! Image file storage.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{ContentError, ContentResult};

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"];

/// Where uploaded image bytes live. Paths handed out are relative and are
/// what the repository stores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Writes `bytes` under a fresh name and returns its relative path.
    async fn save(&self, extension: &str, bytes: &[u8]) -> ContentResult<String>;

    /// Removes a stored file. A file that is already gone is not an error.
    async fn remove(&self, path: &str) -> ContentResult<()>;
}

/// Picks the extension of an uploaded file name, lowercased.
pub fn image_extension(file_name: Option<&str>) -> ContentResult<String> {
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ContentError::Validation("Image file name has no extension".to_string()))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ContentError::Validation(format!(
            "Unsupported image type: {extension}"
        )));
    }
    Ok(extension)
}

/// Stores images as `{uuid}.{ext}` directly in the uploads directory.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn save(&self, extension: &str, bytes: &[u8]) -> ContentResult<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.full_path(&name), bytes).await?;

        tracing::info!(path = %name, size = bytes.len(), "Image stored");
        Ok(name)
    }

    async fn remove(&self, path: &str) -> ContentResult<()> {
        match tokio::fs::remove_file(self.full_path(path)).await {
            Ok(()) => {
                tracing::info!(path = %path, "Image removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path, "Image file already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("doorshop-storage-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(Some("door.PNG")).unwrap(), "png");
        assert_eq!(image_extension(Some("a.b.jpeg")).unwrap(), "jpeg");
        assert!(matches!(
            image_extension(Some("script.sh")),
            Err(ContentError::Validation(_))
        ));
        assert!(image_extension(Some("noext")).is_err());
        assert!(image_extension(None).is_err());
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let root = scratch_dir();
        let storage = LocalImageStorage::new(&root);

        let path = storage.save("png", b"fake-png").await.unwrap();
        assert!(path.ends_with(".png"));
        assert_eq!(tokio::fs::read(root.join(&path)).await.unwrap(), b"fake-png");

        storage.remove(&path).await.unwrap();
        assert!(!root.join(&path).exists());

        // Second removal is a no-op
        storage.remove(&path).await.unwrap();

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
