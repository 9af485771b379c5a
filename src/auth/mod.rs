// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Issues and verifies short-lived bearer tokens.
//!
//! ## Token Flow
//!
//! 1. Caller posts a credential to `/token/`
//! 2. The identity verifier accepts it and returns the subject
//! 3. The issuer signs `{sub, exp}` with the current HMAC key, `exp = now + 1h`
//! 4. Caller sends `Authorization: Bearer <token>` to protected endpoints
//! 5. The gate verifies signature and expiry before the handler runs
//!
//! ## Security
//!
//! - Verification is stateless; a token cannot be revoked before it expires
//! - No clock skew tolerance: a token is expired at exactly `exp`
//! - Rotating the key invalidates every outstanding token

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod identity;
pub mod issuer;
pub mod secret;
pub mod verifier;

pub use claims::{Credential, IssuedToken, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use identity::{AcceptAnyIdentity, IdentityVerifier, StaticIdentities};
pub use issuer::TokenIssuer;
pub use secret::{SecretMaterial, SecretProvider};
pub use verifier::{TokenVerifier, VerificationResult};
