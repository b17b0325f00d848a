//! Transient payload references

use crate::error::{TallyError, TallyResult};
use crate::transport::Download;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;
use tracing::debug;

/// Hands out [`BlobRef`]s and counts the ones still alive
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    live: Arc<AtomicUsize>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of references not yet released
    pub fn active(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Copy `download` into a new transient reference
    pub fn acquire(&self, download: &Download, file_name: &str) -> TallyResult<BlobRef> {
        let mut file = tempfile::Builder::new()
            .prefix("tally-blob-")
            .tempfile()
            .map_err(|e| TallyError::storage(format!("Failed to create blob: {}", e)))?;
        file.write_all(&download.bytes)
            .and_then(|_| file.flush())
            .map_err(|e| TallyError::storage(format!("Failed to write blob: {}", e)))?;

        self.live.fetch_add(1, Ordering::SeqCst);
        debug!(file_name, bytes = download.len(), "acquired blob");

        Ok(BlobRef {
            file,
            file_name: file_name.to_string(),
            size: download.len(),
            live: Arc::clone(&self.live),
        })
    }
}

/// Revocable reference to an in-flight export payload
///
/// Dropping it removes the backing file.
#[derive(Debug)]
pub struct BlobRef {
    file: NamedTempFile,
    file_name: String,
    size: usize,
    live: Arc<AtomicUsize>,
}

impl BlobRef {
    /// Location of the transient copy
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Save the payload as `dir/<file_name>`
    pub async fn save_to(&self, dir: &Path) -> TallyResult<PathBuf> {
        let target = dir.join(&self.file_name);
        tokio::fs::copy(self.file.path(), &target)
            .await
            .map_err(|e| TallyError::io_with_path(e.to_string(), target.display().to_string()))?;
        Ok(target)
    }
}

impl Drop for BlobRef {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        debug!(file_name = %self.file_name, "released blob");
    }
}

/// Acquire a reference for `download`, save it into `dir`, release it
pub async fn save_download(
    store: &BlobStore,
    download: &Download,
    file_name: &str,
    dir: &Path,
) -> TallyResult<PathBuf> {
    let blob = store.acquire(download, file_name)?;
    let saved = blob.save_to(dir).await;
    drop(blob);
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn download(bytes: &[u8]) -> Download {
        Download {
            bytes: bytes.to_vec(),
            content_type: Some("text/csv".to_string()),
            suggested_name: None,
        }
    }

    #[test]
    fn test_drop_releases_blob() {
        let store = BlobStore::new();
        let blob = store.acquire(&download(b"a,b\n"), "transactions.csv").unwrap();
        let path = blob.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(store.active(), 1);
        assert_eq!(blob.size(), 4);

        drop(blob);
        assert_eq!(store.active(), 0);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_save_download_writes_file() {
        let store = BlobStore::new();
        let dir = TempDir::new().unwrap();

        let saved = save_download(&store, &download(b"date,amount\n"), "transactions.csv", dir.path())
            .await
            .unwrap();

        assert_eq!(saved, dir.path().join("transactions.csv"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"date,amount\n");
        assert_eq!(store.active(), 0);
    }

    #[tokio::test]
    async fn test_failed_save_still_releases() {
        let store = BlobStore::new();
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = save_download(&store, &download(b"x"), "transactions.pdf", &missing).await;

        assert!(result.is_err());
        assert_eq!(store.active(), 0);
    }
}
