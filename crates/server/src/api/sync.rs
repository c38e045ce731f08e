//! Knowledge-base sync handlers: start a run, inspect runs.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::jobs::{spawn_sync_job, SyncJob};
use crate::state::AppState;

use super::error_reply;

#[derive(Deserialize, Default)]
pub struct SyncRequest {
    pub subject: Option<String>,
}

/// POST /api/sync — kick off gate → start → track in the background.
pub async fn start(
    State(state): State<Arc<AppState>>,
    body: Option<Json<SyncRequest>>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let Some(ctx) = state.sync.clone() else {
        return Err(error_reply(
            StatusCode::SERVICE_UNAVAILABLE,
            "knowledge base sync is not configured",
        ));
    };

    let subject = body.and_then(|Json(req)| req.subject);
    let id = spawn_sync_job(state.clone(), ctx, subject);

    Ok((StatusCode::ACCEPTED, Json(json!({ "id": id }))))
}

/// Serialize a `SyncJob` to JSON. Manual construction is required because
/// the job uses `RwLock` fields that don't implement `Serialize`.
fn job_to_json(job: &SyncJob) -> Value {
    let state = job.state.read().unwrap();
    let external_id = job.external_id.read().unwrap();
    let observed = job.observed.read().unwrap();
    let completed_at = job.completed_at.read().unwrap();
    let error = job.error.read().unwrap();

    json!({
        "id": job.id,
        "subject": job.subject,
        "state": *state,
        "job_id": *external_id,
        "observed": *observed,
        "created_at": job.created_at,
        "completed_at": *completed_at,
        "error": *error,
    })
}

/// GET /api/sync/jobs — all active/recent sync runs.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Value> {
    let store = state.sync_jobs.jobs.read().unwrap();
    let jobs: Vec<Value> = store.values().map(|job| job_to_json(job)).collect();
    Json(json!(jobs))
}

/// GET /api/sync/jobs/{id} — one sync run.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let store = state.sync_jobs.jobs.read().unwrap();
    let job = store
        .get(&id)
        .ok_or_else(|| error_reply(StatusCode::NOT_FOUND, format!("sync job not found: {id}")))?;
    Ok(Json(job_to_json(job)))
}
