// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate shared by every protected operation.

use super::verifier::{TokenVerifier, VerificationResult};
use super::AuthError;

/// Pull the token out of an `Authorization` header value.
///
/// Everything after the first space is the token; the scheme word itself is
/// not checked. A value without a space is taken whole.
pub fn extract_token(header_value: &str) -> &str {
    header_value
        .split_once(' ')
        .map_or(header_value, |(_, token)| token)
}

/// Admit or reject a raw header value, returning the token subject.
pub fn authorize(header_value: &str, verifier: &TokenVerifier) -> Result<String, AuthError> {
    let token = extract_token(header_value);
    match verifier.verify(token) {
        VerificationResult::Valid(subject) => Ok(subject),
        VerificationResult::Expired => {
            tracing::warn!(target: "token_gate::auth", "Rejected expired token");
            Err(AuthError::TokenExpired)
        }
        VerificationResult::Malformed => {
            tracing::warn!(target: "token_gate::auth", "Rejected malformed token");
            Err(AuthError::MalformedToken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::AcceptAnyIdentity;
    use crate::auth::secret::{SecretMaterial, SecretProvider};
    use crate::auth::{Credential, TokenIssuer};
    use jsonwebtoken::Algorithm;
    use std::sync::Arc;

    #[test]
    fn extract_token_splits_on_first_space() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(extract_token("Token abc"), "abc");
        assert_eq!(extract_token("abc.def.ghi"), "abc.def.ghi");
        assert_eq!(extract_token("Bearer a b"), "a b");
        assert_eq!(extract_token("Bearer "), "");
    }

    fn setup() -> (TokenIssuer, TokenVerifier) {
        let secrets = SecretProvider::new(SecretMaterial::new("gate-key", Algorithm::HS256).unwrap());
        (
            TokenIssuer::new(secrets.clone(), Arc::new(AcceptAnyIdentity)),
            TokenVerifier::new(secrets),
        )
    }

    #[test]
    fn admits_bearer_and_bare_tokens() {
        let (issuer, verifier) = setup();
        let token = issuer.issue(&Credential::new("alice", "pw")).unwrap().token;

        assert_eq!(authorize(&format!("Bearer {token}"), &verifier), Ok("alice".to_string()));
        assert_eq!(authorize(&token, &verifier), Ok("alice".to_string()));
    }

    #[test]
    fn rejects_garbage() {
        let (_, verifier) = setup();
        assert_eq!(authorize("Bearer garbage", &verifier), Err(AuthError::MalformedToken));
    }

    #[test]
    fn rejects_expired() {
        let (issuer, verifier) = setup();
        let past = chrono::Utc::now() - chrono::Duration::hours(2);
        let token = issuer
            .issue_at(&Credential::new("alice", "pw"), past)
            .unwrap()
            .token;

        assert_eq!(
            authorize(&format!("Bearer {token}"), &verifier),
            Err(AuthError::TokenExpired)
        );
    }
}
