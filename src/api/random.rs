// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::{auth::Auth, ids};

/// Generate a random 8-digit numeric identifier.
#[utoipa::path(
    post,
    path = "/random/",
    tag = "Identifiers",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Identifier generated", body = String),
        (status = 401, description = "Invalid token"),
    )
)]
pub async fn random_id(Auth(subject): Auth) -> Json<String> {
    let id = ids::generate();
    tracing::debug!(%subject, "Generated random identifier");
    Json(id)
}
