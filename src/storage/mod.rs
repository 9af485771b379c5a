// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Upload Storage Module
//!
//! Uploaded files are written under a single directory (`uploads/` by
//! default, `UPLOAD_DIR` to override), named exactly as the caller supplied,
//! once the name has been confined to that directory.
//!
//! ## Storage Layout
//!
//! ```text
//! uploads/
//!   {filename}               # completed uploads
//!   .upload-{uuid}.tmp       # in-flight writes, renamed into place
//! ```
//!
//! No metadata is kept beyond the path. The identifier returned by
//! `/upload/` is not recorded anywhere.

pub mod paths;
pub mod uploads;

pub use paths::StoragePaths;
pub use uploads::{StorageError, StorageResult, StoredArtifact, UploadStore};
