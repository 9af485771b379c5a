// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{auth::Credential, state::AppState};

pub mod health;
pub mod random;
pub mod token;
pub mod upload;

pub fn router(state: AppState) -> Router {
    let upload_limit = state.upload_max_bytes;
    let upload_route = || -> MethodRouter<AppState> {
        post(upload::upload_file).layer(DefaultBodyLimit::max(upload_limit))
    };

    let routes = Router::new()
        .route("/token/", post(token::issue_token))
        .route("/token", post(token::issue_token))
        .route("/random/", post(random::random_id))
        .route("/random", post(random::random_id))
        .route("/upload/", upload_route())
        .route("/upload", upload_route())
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        token::issue_token,
        random::random_id,
        upload::upload_file,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Credential,
            token::TokenResponse,
            upload::UploadForm,
            upload::UploadResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Tokens", description = "Bearer token issuance"),
        (name = "Identifiers", description = "Random identifier generation"),
        (name = "Uploads", description = "File uploads"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
