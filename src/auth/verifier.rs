// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification.
//!
//! Verification is local: signature and expiry are checked against the
//! current secret material and clock, with no registry lookup. Expiry is
//! strict, with no clock-skew leeway, so a token is expired at exactly `exp`.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};

use super::secret::SecretProvider;
use super::TokenClaims;

/// Outcome of verifying a presented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    /// Signature and expiry check out; carries the subject.
    Valid(String),
    /// Signature is good but `now >= exp`.
    Expired,
    /// Signature, encoding, algorithm or claim shape is wrong.
    Malformed,
}

impl VerificationResult {
    #[cfg(test)]
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid(_))
    }
}

/// Checks tokens signed by a [`TokenIssuer`](super::TokenIssuer) sharing
/// the same [`SecretProvider`].
#[derive(Clone, Debug)]
pub struct TokenVerifier {
    secrets: SecretProvider,
}

impl TokenVerifier {
    pub fn new(secrets: SecretProvider) -> Self {
        Self { secrets }
    }

    /// Verify against the current time.
    pub fn verify(&self, token: &str) -> VerificationResult {
        self.verify_at(token, Utc::now())
    }

    /// Verify as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> VerificationResult {
        let material = self.secrets.current_material();

        let mut validation = Validation::new(material.algorithm());
        // Expiry is compared below against `now`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let claims = match decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(material.key()),
            &validation,
        ) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(target: "token_gate::auth", error = ?e.kind(), "Token decode failed");
                return VerificationResult::Malformed;
            }
        };

        if now.timestamp() >= claims.exp {
            return VerificationResult::Expired;
        }
        VerificationResult::Valid(claims.sub)
    }
}
