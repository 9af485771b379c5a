// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key material shared by the issuer and the verifier.
//!
//! The provider hands out immutable snapshots. Rotation swaps the snapshot
//! in place; tokens signed with the previous key stop verifying.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::Algorithm;
use rand::RngCore;

/// Default length (in random bytes) of a generated key.
pub const DEFAULT_SECRET_LENGTH: usize = 32;

/// Errors raised when building secret material.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("signing key must not be empty")]
    EmptyKey,
    #[error("algorithm {0:?} is not a symmetric HMAC algorithm")]
    UnsupportedAlgorithm(Algorithm),
    #[error("unknown algorithm name: {0}")]
    UnknownAlgorithm(String),
}

/// Key bytes plus the HMAC algorithm they are used with.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretMaterial {
    key: Vec<u8>,
    algorithm: Algorithm,
}

impl SecretMaterial {
    pub fn new(key: impl Into<Vec<u8>>, algorithm: Algorithm) -> Result<Self, SecretError> {
        let key = key.into();
        if key.is_empty() {
            return Err(SecretError::EmptyKey);
        }
        if !is_hmac(algorithm) {
            return Err(SecretError::UnsupportedAlgorithm(algorithm));
        }
        Ok(Self { key, algorithm })
    }

    /// Fresh random key for processes started without a configured secret.
    pub fn ephemeral(algorithm: Algorithm) -> Result<Self, SecretError> {
        Self::new(generate_secret_key(DEFAULT_SECRET_LENGTH), algorithm)
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretMaterial")
            .field("key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Process-wide holder of the current [`SecretMaterial`].
///
/// Cloning shares the same underlying slot, so a rotation is observed by
/// every clone.
#[derive(Clone)]
pub struct SecretProvider {
    current: Arc<RwLock<Arc<SecretMaterial>>>,
}

impl SecretProvider {
    pub fn new(material: SecretMaterial) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(material))),
        }
    }

    /// Snapshot of the material in effect right now.
    pub fn current_material(&self) -> Arc<SecretMaterial> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the material. In-flight operations keep the snapshot they took.
    pub fn rotate(&self, material: SecretMaterial) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(material);
        tracing::info!(algorithm = ?guard.algorithm(), "Signing key rotated");
    }
}

impl fmt::Debug for SecretProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretProvider")
            .field("current", &self.current_material())
            .finish()
    }
}

/// Generate a URL-safe random key from `length` random bytes.
pub fn generate_secret_key(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rand::thread_rng().fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}

/// Parse an algorithm name, accepting only the HMAC family.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, SecretError> {
    match name.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(SecretError::UnknownAlgorithm(other.to_string())),
    }
}

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_key() {
        let result = SecretMaterial::new(Vec::new(), Algorithm::HS256);
        assert_eq!(result, Err(SecretError::EmptyKey));
    }

    #[test]
    fn rejects_asymmetric_algorithm() {
        let result = SecretMaterial::new("key", Algorithm::RS256);
        assert_eq!(result, Err(SecretError::UnsupportedAlgorithm(Algorithm::RS256)));
    }

    #[test]
    fn debug_redacts_key() {
        let material = SecretMaterial::new("super-secret", Algorithm::HS256).unwrap();
        let rendered = format!("{material:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn provider_returns_same_material_until_rotated() {
        let material = SecretMaterial::new("first", Algorithm::HS256).unwrap();
        let provider = SecretProvider::new(material.clone());

        assert_eq!(*provider.current_material(), material);
        assert_eq!(*provider.current_material(), material);
    }

    #[test]
    fn rotation_is_visible_to_clones() {
        let provider = SecretProvider::new(SecretMaterial::new("first", Algorithm::HS256).unwrap());
        let clone = provider.clone();
        let before = provider.current_material();

        provider.rotate(SecretMaterial::new("second", Algorithm::HS512).unwrap());

        let after = clone.current_material();
        assert_eq!(after.key(), b"second");
        assert_eq!(after.algorithm(), Algorithm::HS512);
        // Earlier snapshots are untouched.
        assert_eq!(before.key(), b"first");
    }

    #[test]
    fn generated_keys_are_url_safe_and_distinct() {
        let a = generate_secret_key(DEFAULT_SECRET_LENGTH);
        let b = generate_secret_key(DEFAULT_SECRET_LENGTH);
        assert_ne!(a, b);
        // 32 bytes -> 43 unpadded base64 characters
        assert_eq!(a.len(), 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn parse_algorithm_accepts_hmac_only() {
        assert_eq!(parse_algorithm("HS256"), Ok(Algorithm::HS256));
        assert_eq!(parse_algorithm("hs384"), Ok(Algorithm::HS384));
        assert_eq!(parse_algorithm(" HS512 "), Ok(Algorithm::HS512));
        assert!(matches!(
            parse_algorithm("RS256"),
            Err(SecretError::UnknownAlgorithm(_))
        ));
    }
}
