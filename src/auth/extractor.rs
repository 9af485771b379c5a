// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authorized callers.
//!
//! Put `Auth` first in a handler's argument list so the gate runs before
//! any body extractor touches the request:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(subject): Auth) -> impl IntoResponse {
//!     // subject is the token's `sub` claim
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{gate, AuthError};
use crate::state::AppState;

/// Subject of a token that passed the authorization gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth(pub String);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                tracing::warn!(target: "token_gate::auth", "Rejected request without authorization header");
                AuthError::MissingAuthHeader
            })?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let subject = gate::authorize(header_value, &state.verifier)?;
        Ok(Auth(subject))
    }
}
