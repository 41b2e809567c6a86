use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

/// Stored-image directory. Files are addressed by bare name only.
#[derive(Clone, Debug)]
pub struct UploadStorage {
    dir: PathBuf,
}

impl UploadStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Writes `bytes` under `file_name` and returns the stored path.
    pub async fn store(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(file_name);
        if let Err(error) = fs::write(&path, bytes).await {
            // A partial write must not stay behind.
            let _ = fs::remove_file(&path).await;
            return Err(error);
        }
        Ok(path)
    }

    /// Best-effort removal used when a later step of the upload fails.
    pub async fn discard(&self, path: &Path, correlation_id: &str) {
        if let Err(error) = fs::remove_file(path).await {
            if error.kind() != io::ErrorKind::NotFound {
                warn!(
                    event_name = "storage.discard_failed",
                    correlation_id,
                    path = %path.display(),
                    error = %error,
                    "stored upload could not be removed"
                );
            }
        }
    }
}
