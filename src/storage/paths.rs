// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the upload storage layout.

use std::path::{Component, Path, PathBuf};

use super::StorageError;

/// Default upload directory, relative to the working directory.
pub const UPLOAD_ROOT: &str = "uploads";

/// Prefix of the temporary files written before the final rename.
pub const TEMP_PREFIX: &str = ".upload-";

/// Storage path utilities for uploaded files.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(UPLOAD_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory all uploads land in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a caller-supplied filename to a path inside the root.
    ///
    /// Only a single plain file name is accepted; anything that could
    /// resolve outside the root is refused. Names in the temporary-file
    /// namespace are refused too.
    pub fn upload(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if filename.is_empty() {
            return Err(StorageError::MissingFilename);
        }
        if filename.contains(['/', '\\', '\0']) || filename.starts_with(TEMP_PREFIX) {
            return Err(StorageError::InvalidFilename(filename.to_string()));
        }

        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.root.join(name)),
            _ => Err(StorageError::InvalidFilename(filename.to_string())),
        }
    }

    /// Hidden temporary file in the root, distinguished by `unique`.
    pub fn temp_for(&self, unique: &str) -> PathBuf {
        self.root.join(format!("{TEMP_PREFIX}{unique}.tmp"))
    }
}
