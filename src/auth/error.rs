// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Detail returned for every rejected token, whatever the reason.
pub const INVALID_TOKEN_DETAIL: &str = "Invalid token";

/// Authentication error type.
///
/// Token rejections (missing, unparseable, malformed or expired) all surface
/// as 401 with the same `detail`; `error_code` carries the finer reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Authorization header is not valid visible ASCII
    InvalidAuthHeader,
    /// Token failed signature, encoding or algorithm checks
    MalformedToken,
    /// Token has expired
    TokenExpired,
    /// Issuance requested with an empty username
    EmptyUsername,
    /// Identity verification refused the credential
    InvalidCredentials,
    /// The signing primitive failed
    SigningFailed(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    detail: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::EmptyUsername => "empty_username",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::SigningFailed(_) => "signing_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::EmptyUsername => StatusCode::BAD_REQUEST,
            AuthError::SigningFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error is a rejection of a presented token.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MissingAuthHeader
                | AuthError::InvalidAuthHeader
                | AuthError::MalformedToken
                | AuthError::TokenExpired
        )
    }

    fn detail(&self) -> String {
        if self.is_token_rejection() {
            return INVALID_TOKEN_DETAIL.to_string();
        }
        match self {
            // Signing internals stay in the logs.
            AuthError::SigningFailed(_) => "Token could not be issued".to_string(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => write!(f, "Authorization header is not valid text"),
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::EmptyUsername => write!(f, "Username must not be empty"),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::SigningFailed(msg) => write!(f, "Failed to sign token: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let AuthError::SigningFailed(ref msg) = self {
            tracing::error!(error = %msg, "Token signing failed");
        }
        let body = Json(AuthErrorBody {
            detail: self.detail(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn expired_token_returns_401_with_fixed_detail() {
        let response = AuthError::TokenExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["detail"], "Invalid token");
        assert_eq!(body["error_code"], "token_expired");
    }

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["detail"], "Invalid token");
        assert_eq!(body["error_code"], "missing_auth_header");
    }

    #[tokio::test]
    async fn empty_username_is_a_bad_request() {
        let response = AuthError::EmptyUsername.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error_code"], "empty_username");
    }

    #[tokio::test]
    async fn signing_failure_does_not_leak_details() {
        let response = AuthError::SigningFailed("key exploded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(!body["detail"].as_str().unwrap().contains("exploded"));
    }
}
