//! Blob storage for attachment files
//!
//! Blobs are written once by the upload intake and deleted once no version
//! of their article references them. `put` refuses an existing filename,
//! so many versions can point at the same filename safely.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::error::{ArticleError, ArticleResult};
use crate::validation::validate_stored_filename;

/// Storage backend for attachment blobs, keyed by stored filename
pub trait BlobStore: Send + Sync {
    /// Write a new blob; an existing filename fails with
    /// [`ArticleError::BlobExists`] and its bytes are left untouched
    fn put(&self, filename: &str, bytes: &[u8]) -> ArticleResult<()>;

    /// Delete a blob; deleting an absent blob succeeds
    fn delete(&self, filename: &str) -> ArticleResult<()>;

    /// Check whether a blob is present
    fn exists(&self, filename: &str) -> bool;
}

/// Filesystem backend rooted at the uploads directory
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create the backend, creating the root directory if needed
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored filename to a path inside the root
    pub fn resolve(&self, filename: &str) -> ArticleResult<PathBuf> {
        validate_stored_filename(filename)?;
        Ok(self.root.join(filename))
    }

    fn cleanup_error(filename: &str, e: impl std::fmt::Display) -> ArticleError {
        ArticleError::ResourceCleanupFailure {
            filename: filename.to_string(),
            reason: e.to_string(),
        }
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, filename: &str, bytes: &[u8]) -> ArticleResult<()> {
        let path = self.resolve(filename)?;
        let temp_path = self
            .root
            .join(format!(".{}.{}.part", filename, Uuid::new_v4().simple()));

        // hard_link publishes the complete file and fails if the name is taken
        let write = || -> std::io::Result<()> {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::hard_link(&temp_path, &path)
        };
        let result = write();

        if let Err(e) = fs::remove_file(&temp_path) {
            if e.kind() != ErrorKind::NotFound {
                debug!(filename, error = %e, "temp blob left behind");
            }
        }

        match result {
            Ok(()) => {
                debug!(filename, size = bytes.len(), "blob written");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(ArticleError::BlobExists(filename.to_string()))
            }
            Err(e) => Err(ArticleError::StorageFailure(e.into())),
        }
    }

    fn delete(&self, filename: &str) -> ArticleResult<()> {
        let path = self
            .resolve(filename)
            .map_err(|e| Self::cleanup_error(filename, e))?;

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(filename, "blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::cleanup_error(filename, e)),
        }
    }

    fn exists(&self, filename: &str) -> bool {
        self.resolve(filename)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }
}
