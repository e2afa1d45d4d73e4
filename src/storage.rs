//! Local file storage for uploaded images and videos.
//!
//! Files are written under `<root>/<category>/<uuid>.<ext>`. The generated file
//! name is the handle stored in the database; the original upload name is only
//! used for its extension. Saving rejects disallowed extensions by returning
//! `None`. Deleting never fails: errors are logged and swallowed so the record
//! mutation that follows can still complete.

use crate::errors::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Extensions accepted for image uploads.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Extensions accepted for video uploads.
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "webm", "ogg"];

/// Sub-directory a file is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Agency logos
    Logos,
    /// Agency covers
    Covers,
    /// Carousel images and background video
    Carousel,
    /// Agency gallery images
    Agencies,
}

impl Category {
    /// Every category, in directory creation order.
    pub const ALL: [Self; 4] = [Self::Logos, Self::Covers, Self::Carousel, Self::Agencies];

    /// Directory name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Logos => "logos",
            Self::Covers => "covers",
            Self::Carousel => "carousel",
            Self::Agencies => "agencies",
        }
    }
}

/// Kind of media an upload is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// One of [`IMAGE_EXTENSIONS`]
    Image,
    /// One of [`VIDEO_EXTENSIONS`]
    Video,
}

impl MediaKind {
    const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => &IMAGE_EXTENSIONS,
            Self::Video => &VIDEO_EXTENSIONS,
        }
    }
}

/// An uploaded file as received from the caller.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Name the client gave the file
    pub filename: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload from a client file name and its contents.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Lowercased extension of the client file name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Whether the upload has a name and an extension allowed for `kind`.
    #[must_use]
    pub fn is_allowed(&self, kind: MediaKind) -> bool {
        self.extension()
            .is_some_and(|ext| kind.extensions().contains(&ext.as_str()))
    }
}

/// Blob storage rooted at the upload folder.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. Nothing is touched on disk until
    /// [`FileStore::ensure_directories`] or [`FileStore::save`] runs.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root and every category directory.
    pub async fn ensure_directories(&self) -> Result<()> {
        for category in Category::ALL {
            let dir = self.root.join(category.as_str());
            tokio::fs::create_dir_all(&dir).await.map_err(|e| Error::Storage {
                message: format!("Failed to create directory {}: {e}", dir.display()),
            })?;
            debug!("Ensured upload directory {}", dir.display());
        }
        Ok(())
    }

    /// Location of a stored file.
    #[must_use]
    pub fn path_for(&self, category: Category, handle: &str) -> PathBuf {
        self.root.join(category.as_str()).join(handle)
    }

    /// Public URL of a stored file.
    #[must_use]
    pub fn url_for(category: Category, handle: &str) -> String {
        format!("/uploads/{}/{handle}", category.as_str())
    }

    /// Stores `upload` under a fresh random name.
    ///
    /// Returns `Ok(None)` when the upload has no name or its extension is not
    /// allowed for `kind`.
    ///
    /// # Errors
    /// Returns [`Error::Storage`] when the file cannot be written.
    pub async fn save(
        &self,
        upload: &Upload,
        kind: MediaKind,
        category: Category,
    ) -> Result<Option<String>> {
        if !upload.is_allowed(kind) {
            debug!(
                "Rejected upload '{}' for {:?} in {}",
                upload.filename,
                kind,
                category.as_str()
            );
            return Ok(None);
        }
        let Some(ext) = upload.extension() else {
            return Ok(None);
        };

        let dir = self.root.join(category.as_str());
        tokio::fs::create_dir_all(&dir).await.map_err(|e| Error::Storage {
            message: format!("Failed to create directory {}: {e}", dir.display()),
        })?;

        let handle = format!("{}.{ext}", Uuid::new_v4().simple());
        let path = dir.join(&handle);
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| Error::Storage {
                message: format!("Failed to save '{}': {e}", upload.filename),
            })?;

        info!(
            "Saved upload '{}' as {}/{}",
            upload.filename,
            category.as_str(),
            handle
        );
        Ok(Some(handle))
    }

    /// Removes a stored file. Failures are logged, never returned.
    pub async fn delete(&self, category: Category, handle: &str) {
        if handle.is_empty() || Path::new(handle).file_name() != Some(OsStr::new(handle)) {
            warn!("Refusing to delete suspicious file handle '{}'", handle);
            return;
        }

        let path = self.path_for(category, handle);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("Deleted file {}/{}", category.as_str(), handle),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("File {} already absent", path.display());
            }
            Err(e) => warn!("Failed to delete file {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_extension_checks_are_case_insensitive() {
        assert!(Upload::new("LOGO.PNG", vec![1]).is_allowed(MediaKind::Image));
        assert!(Upload::new("clip.WebM", vec![1]).is_allowed(MediaKind::Video));
        assert!(!Upload::new("clip.mp4", vec![1]).is_allowed(MediaKind::Image));
        assert!(!Upload::new("script.exe", vec![1]).is_allowed(MediaKind::Image));
        assert!(!Upload::new("noextension", vec![1]).is_allowed(MediaKind::Image));
        assert!(!Upload::new("", vec![1]).is_allowed(MediaKind::Image));
        assert!(!Upload::new("trailingdot.", vec![1]).is_allowed(MediaKind::Image));
    }

    #[test]
    fn test_url_for() {
        assert_eq!(
            FileStore::url_for(Category::Logos, "abc.png"),
            "/uploads/logos/abc.png"
        );
    }

    #[tokio::test]
    async fn test_save_and_delete() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let handle = store
            .save(&Upload::new("photo.JPG", b"jpeg".to_vec()), MediaKind::Image, Category::Covers)
            .await?
            .unwrap();
        assert!(handle.ends_with(".jpg"));
        let path = store.path_for(Category::Covers, &handle);
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");

        store.delete(Category::Covers, &handle).await;
        assert!(!path.exists());

        // Deleting again only logs
        store.delete(Category::Covers, &handle).await;
        Ok(())
    }

    #[tokio::test]
    async fn test_save_rejects_wrong_kind() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let handle = store
            .save(&Upload::new("movie.mp4", vec![0]), MediaKind::Image, Category::Carousel)
            .await?;
        assert!(handle.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_handles_are_unique() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let upload = Upload::new("a.png", vec![1, 2, 3]);

        let first = store.save(&upload, MediaKind::Image, Category::Logos).await?;
        let second = store.save(&upload, MediaKind::Image, Category::Logos).await?;
        assert_ne!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_directories() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("uploads"));
        store.ensure_directories().await?;
        for category in Category::ALL {
            assert!(store.root().join(category.as_str()).is_dir());
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_refuses_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("keep.txt");
        std::fs::write(&outside, b"keep").unwrap();
        let store = FileStore::new(dir.path().join("uploads"));

        store.delete(Category::Logos, "../../keep.txt").await;
        assert!(outside.exists());
    }
}
