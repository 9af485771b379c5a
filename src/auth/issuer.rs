// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use super::identity::IdentityVerifier;
use super::secret::SecretProvider;
use super::{AuthError, Credential, IssuedToken, TokenClaims};

/// Lifetime of every issued token. Not configurable.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// Signs `{sub, exp}` claims for verified credentials.
#[derive(Clone)]
pub struct TokenIssuer {
    secrets: SecretProvider,
    identity: Arc<dyn IdentityVerifier>,
}

impl TokenIssuer {
    pub fn new(secrets: SecretProvider, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { secrets, identity }
    }

    /// Issue a token valid for one hour from now.
    pub fn issue(&self, credential: &Credential) -> Result<IssuedToken, AuthError> {
        self.issue_at(credential, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        credential: &Credential,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        if credential.username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        let subject = self.identity.authenticate(credential)?;

        let expires_at = now + Duration::seconds(TOKEN_LIFETIME_SECS);
        let claims = TokenClaims {
            sub: subject,
            exp: expires_at.timestamp(),
        };

        let material = self.secrets.current_material();
        let token = encode(
            &Header::new(material.algorithm()),
            &claims,
            &EncodingKey::from_secret(material.key()),
        )
        .map_err(|e| AuthError::SigningFailed(e.to_string()))?;

        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or(expires_at);
        tracing::info!(subject = %claims.sub, %expires_at, "Issued bearer token");

        Ok(IssuedToken {
            token,
            subject: claims.sub,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::{AcceptAnyIdentity, StaticIdentities};
    use crate::auth::secret::SecretMaterial;
    use jsonwebtoken::Algorithm;

    fn issuer_with(identity: Arc<dyn IdentityVerifier>) -> TokenIssuer {
        let material = SecretMaterial::new("issuer-test-key", Algorithm::HS256).unwrap();
        TokenIssuer::new(SecretProvider::new(material), identity)
    }

    #[test]
    fn token_expires_one_hour_after_issuance() {
        let issuer = issuer_with(Arc::new(AcceptAnyIdentity));
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let issued = issuer.issue_at(&Credential::new("alice", "pw"), now).unwrap();

        assert_eq!(issued.subject, "alice");
        assert_eq!(issued.expires_at.timestamp(), 1_700_003_600);
        assert_eq!(issued.token.split('.').count(), 3);
    }

    #[test]
    fn empty_username_is_rejected_before_identity_check() {
        let issuer = issuer_with(Arc::new(StaticIdentities::default()));
        let result = issuer.issue(&Credential::new("", "pw"));
        assert!(matches!(result, Err(AuthError::EmptyUsername)));
    }

    #[test]
    fn identity_rejection_stops_issuance() {
        let identities = StaticIdentities::default().with_user("alice", "right");
        let issuer = issuer_with(Arc::new(identities));

        let result = issuer.issue(&Credential::new("alice", "wrong"));
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn header_carries_configured_algorithm() {
        let material = SecretMaterial::new("issuer-test-key", Algorithm::HS512).unwrap();
        let issuer = TokenIssuer::new(SecretProvider::new(material), Arc::new(AcceptAnyIdentity));

        let issued = issuer.issue(&Credential::new("alice", "pw")).unwrap();
        let header = jsonwebtoken::decode_header(&issued.token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
    }
}
