// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File upload endpoint.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{auth::Auth, error::ApiError, ids, state::AppState};

/// Name of the multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Multipart form accepted by POST /upload/
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// File content; the part's filename names the stored file
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Response for POST /upload/
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Random 8-digit receipt. It does not identify the stored file.
    pub id: String,
}

/// Detail returned when the body exceeds `UPLOAD_MAX_BYTES`.
pub const TOO_LARGE_DETAIL: &str = "Upload exceeds the size limit";

fn multipart_error(e: MultipartError) -> ApiError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::payload_too_large(TOO_LARGE_DETAIL),
        status => ApiError::new(status, e.body_text()),
    }
}

/// Store an uploaded file under its supplied name.
#[utoipa::path(
    post,
    path = "/upload/",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    tag = "Uploads",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Filename missing or invalid"),
        (status = 401, description = "Invalid token"),
        (status = 413, description = "Upload too large"),
    )
)]
pub async fn upload_file(
    Auth(subject): Auth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::bad_request("Filename is required"));
        }
        let content = field.bytes().await.map_err(multipart_error)?;

        let artifact = state.uploads.store(&filename, &content).await?;
        let id = ids::generate();
        tracing::info!(
            %subject,
            path = %artifact.path.display(),
            size = artifact.size,
            %id,
            "Upload stored"
        );
        return Ok(Json(UploadResponse { id }));
    }

    Err(ApiError::bad_request("No file provided in multipart data"))
}
