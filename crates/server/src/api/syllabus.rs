//! Syllabus upload and listing handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::warn;

use examgen_intake::IntakeError;

use crate::state::AppState;

use super::error_reply;

/// PUT /api/syllabus/{subject} — raw PDF body.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(subject): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let stored = state
        .documents
        .put_syllabus(&subject, body)
        .await
        .map_err(|e| match e {
            IntakeError::NotPdf | IntakeError::EmptySubject => {
                error_reply(StatusCode::BAD_REQUEST, e.to_string())
            }
            other => {
                warn!(error = %other, "syllabus upload failed");
                error_reply(StatusCode::BAD_GATEWAY, other.to_string())
            }
        })?;

    Ok(Json(json!(stored)))
}

/// GET /api/syllabus — subjects with an uploaded syllabus.
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let subjects = state.documents.list_subjects().await.map_err(|e| {
        warn!(error = %e, "syllabus listing failed");
        error_reply(StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    Ok(Json(json!({ "subjects": subjects })))
}
