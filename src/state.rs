// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{IdentityVerifier, SecretMaterial, SecretProvider, TokenIssuer, TokenVerifier};
use crate::storage::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub secrets: SecretProvider,
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
    pub uploads: UploadStore,
    /// Request body limit for uploads, in bytes.
    pub upload_max_bytes: usize,
}

impl AppState {
    pub fn new(
        material: SecretMaterial,
        identity: Arc<dyn IdentityVerifier>,
        uploads: UploadStore,
        upload_max_bytes: usize,
    ) -> Self {
        let secrets = SecretProvider::new(material);
        Self {
            issuer: TokenIssuer::new(secrets.clone(), identity),
            verifier: TokenVerifier::new(secrets.clone()),
            secrets,
            uploads,
            upload_max_bytes,
        }
    }

    /// Open-issuance state with a fixed key, writing uploads under `upload_dir`.
    #[cfg(test)]
    pub fn for_tests(upload_dir: impl Into<std::path::PathBuf>) -> Self {
        let material = SecretMaterial::new("test-signing-key", jsonwebtoken::Algorithm::HS256)
            .expect("static test key is valid");
        Self::new(
            material,
            Arc::new(crate::auth::AcceptAnyIdentity),
            UploadStore::new(crate::storage::StoragePaths::new(upload_dir.into())),
            crate::config::DEFAULT_UPLOAD_MAX_BYTES,
        )
    }
}
