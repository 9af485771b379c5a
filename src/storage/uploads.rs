// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistence for uploaded files.
//!
//! Every write goes to a uniquely named temporary file in the upload
//! directory and is then renamed over the target, so readers only ever see
//! a complete file. Writes to the same target are additionally serialized
//! through a per-path lock; the last completed write wins.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::StoragePaths;

/// Error type for upload storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No filename was supplied
    #[error("filename is required")]
    MissingFilename,
    /// Filename would resolve outside the upload directory
    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Health check read back different bytes
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Location of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub path: PathBuf,
    pub size: u64,
}

type PathLocks = HashMap<PathBuf, Arc<Mutex<()>>>;

/// Upload store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    paths: StoragePaths,
    locks: Arc<StdMutex<PathLocks>>,
}

impl UploadStore {
    /// Create a store. The directory is created lazily on first write.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Create the upload directory. Safe to call multiple times.
    pub async fn initialize(&self) -> StorageResult<()> {
        fs::create_dir_all(self.paths.root()).await?;
        Ok(())
    }

    /// Check the upload directory can be created, written and read back.
    pub async fn health_check(&self) -> StorageResult<()> {
        self.initialize().await?;

        let test_file = TempFile::new(self.fresh_temp_path());
        let test_data = b"health_check_data";

        fs::write(test_file.path(), test_data).await?;
        let read_data = fs::read(test_file.path()).await?;
        fs::remove_file(test_file.path()).await?;
        test_file.disarm();

        if read_data != test_data {
            return Err(StorageError::IntegrityViolation(
                "Health check data mismatch".to_string(),
            ));
        }
        Ok(())
    }

    /// Store `content` under `filename`, replacing any existing file.
    ///
    /// Dropping the returned future before it completes leaves no temporary
    /// file and no lock entry behind.
    pub async fn store(&self, filename: &str, content: &[u8]) -> StorageResult<StoredArtifact> {
        let target = self.paths.upload(filename)?;
        self.initialize().await?;

        let entry = PathLock::register(&self.locks, &target);
        {
            let _held = entry.mutex.lock().await;
            self.write_replacing(&target, content).await?;
        }

        tracing::debug!(path = %target.display(), size = content.len(), "Stored upload");
        Ok(StoredArtifact {
            path: target,
            size: content.len() as u64,
        })
    }

    /// Read a stored upload back.
    #[cfg(test)]
    pub async fn read(&self, filename: &str) -> StorageResult<Vec<u8>> {
        let target = self.paths.upload(filename)?;
        Ok(fs::read(target).await?)
    }

    fn fresh_temp_path(&self) -> PathBuf {
        self.paths.temp_for(&uuid::Uuid::new_v4().simple().to_string())
    }

    async fn write_replacing(&self, target: &Path, content: &[u8]) -> StorageResult<()> {
        let temp = TempFile::new(self.fresh_temp_path());

        let mut file = fs::File::create(temp.path()).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(temp.path(), target).await?;

        temp.disarm();
        Ok(())
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Temporary file removed on drop unless disarmed.
struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.armed {
            // Already gone is fine: the rename may have consumed it.
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Registration in the per-path lock table, released on drop.
struct PathLock {
    table: Arc<StdMutex<PathLocks>>,
    target: PathBuf,
    mutex: Arc<Mutex<()>>,
}

impl PathLock {
    fn register(table: &Arc<StdMutex<PathLocks>>, target: &Path) -> Self {
        let mutex = {
            let mut locks = table.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(target.to_path_buf()).or_default())
        };
        Self {
            table: Arc::clone(table),
            target: target.to_path_buf(),
            mutex,
        }
    }
}

impl Drop for PathLock {
    fn drop(&mut self) {
        let mut locks = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // Held only by the table and this registration: nobody is waiting.
        let idle = locks
            .get(&self.target)
            .is_some_and(|l| Arc::ptr_eq(l, &self.mutex) && Arc::strong_count(l) == 2);
        if idle {
            locks.remove(&self.target);
        }
    }
}
