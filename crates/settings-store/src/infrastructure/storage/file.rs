//! File-backed [`BlobStore`].
//!
//! Replacement writes the new bytes to `<name>.tmp` next to the target,
//! syncs it, and renames it over the target.  A rename within one directory
//! is atomic on every supported platform, so readers never see a partially
//! written file.  The temp file is removed if any step fails.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::BlobStore;

/// A blob stored in one file.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path used while a replacement is in flight.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("blob"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn replace(&self, bytes: Vec<u8>) -> io::Result<()> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let temp = self.temp_path();
        if let Err(e) = write_synced(&temp, &bytes).await {
            discard(&temp).await;
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp, &self.path).await {
            discard(&temp).await;
            return Err(e);
        }

        debug!(path = %self.path.display(), len = bytes.len(), "replaced blob");
        Ok(())
    }
}

/// Writes `bytes` to a fresh file at `path` and waits until they are on disk.
/// The handle is closed when this returns, on success and on error alike.
async fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

async fn discard(temp: &Path) {
    if let Err(e) = fs::remove_file(temp).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %temp.display(), error = %e, "failed to remove temp file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("settings_blob_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_temp_path_is_sibling_with_tmp_suffix() {
        let store = FileBlobStore::new("/data/app-settings.json");
        assert_eq!(store.temp_path(), PathBuf::from("/data/app-settings.json.tmp"));
    }

    #[test]
    fn test_location_is_path() {
        let store = FileBlobStore::new("settings.json");
        assert_eq!(store.location(), "settings.json");
    }

    #[tokio::test]
    async fn test_read_missing_file_returns_none() {
        let store = FileBlobStore::new(temp_dir().join("absent.json"));
        assert_eq!(store.read().await.expect("read"), None);
    }

    #[tokio::test]
    async fn test_replace_creates_directory_and_file() {
        // Arrange
        let dir = temp_dir();
        let store = FileBlobStore::new(dir.join("nested").join("blob.json"));

        // Act
        store.replace(b"first".to_vec()).await.expect("replace");

        // Assert
        assert_eq!(store.read().await.expect("read"), Some(b"first".to_vec()));
        assert!(!store.temp_path().exists(), "temp file must not be left behind");

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_replace_overwrites_previous_content() {
        let dir = temp_dir();
        let store = FileBlobStore::new(dir.join("blob.json"));

        store.replace(b"a much longer first value".to_vec()).await.expect("replace");
        store.replace(b"short".to_vec()).await.expect("replace");

        assert_eq!(store.read().await.expect("read"), Some(b"short".to_vec()));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_read_directory_is_io_error_not_absence() {
        // Arrange: the target path exists but is a directory, so it cannot be read
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let store = FileBlobStore::new(&dir);

        // Act
        let result = store.read().await;

        // Assert
        assert!(result.is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
