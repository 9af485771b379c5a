// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::{AuthError, Credential},
    state::AppState,
};

/// Response for POST /token/
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
}

/// Issue a bearer token for a credential.
///
/// No authorization is required. The token expires one hour after issuance.
/// The token is returned in the OAuth2-style `access_token` field alongside
/// `token_type: "bearer"`; there is no separate `token` field.
#[utoipa::path(
    post,
    path = "/token/",
    request_body = Credential,
    tag = "Tokens",
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Username is empty"),
        (status = 401, description = "Credential rejected"),
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(credential): Json<Credential>,
) -> Result<Json<TokenResponse>, AuthError> {
    let issued = state.issuer.issue(&credential)?;
    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "bearer".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::VerificationResult;
    use tempfile::TempDir;

    #[tokio::test]
    async fn issue_token_returns_verifiable_bearer_token() {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::for_tests(temp_dir.path());

        let Json(response) = issue_token(
            State(state.clone()),
            Json(Credential::new("alice", "anything")),
        )
        .await
        .expect("token issued");

        assert_eq!(response.token_type, "bearer");
        assert_eq!(
            state.verifier.verify(&response.access_token),
            VerificationResult::Valid("alice".to_string())
        );
    }

    #[tokio::test]
    async fn issue_token_rejects_empty_username() {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::for_tests(temp_dir.path());

        let result = issue_token(State(state), Json(Credential::new("", "pw"))).await;
        assert!(matches!(result, Err(AuthError::EmptyUsername)));
    }
}
