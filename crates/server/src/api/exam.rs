//! Unit extraction and exam-paper generation handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use examgen_exam::{ExamGenerator, GenerateError, PaperPlan};

use crate::state::AppState;

use super::error_reply;

fn require_generator(state: &AppState) -> Result<&ExamGenerator, (StatusCode, Json<Value>)> {
    state.generator.as_ref().ok_or_else(|| {
        error_reply(
            StatusCode::SERVICE_UNAVAILABLE,
            "exam generation is not configured",
        )
    })
}

fn generation_error(e: GenerateError) -> (StatusCode, Json<Value>) {
    warn!(error = %e, "generation request failed");
    match e {
        GenerateError::NotConfigured(_) => error_reply(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        _ => error_reply(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

#[derive(Deserialize)]
pub struct UnitsRequest {
    pub subject: String,
}

/// POST /api/exam/units — extract the subject's chapter/unit list.
pub async fn units(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnitsRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let generator = require_generator(&state)?;
    if req.subject.trim().is_empty() {
        return Err(error_reply(StatusCode::BAD_REQUEST, "subject is required"));
    }

    let units = generator
        .extract_units(req.subject.trim())
        .await
        .map_err(generation_error)?;

    Ok(Json(json!({ "subject": req.subject.trim(), "units": units })))
}

fn default_part_a() -> u32 {
    10
}
fn default_part_b() -> u32 {
    5
}
fn default_part_c() -> u32 {
    2
}

#[derive(Deserialize)]
pub struct PaperRequest {
    pub subject: String,
    pub units: Vec<String>,
    #[serde(default = "default_part_a")]
    pub part_a: u32,
    #[serde(default = "default_part_b")]
    pub part_b: u32,
    #[serde(default = "default_part_c")]
    pub part_c: u32,
}

/// POST /api/exam/paper — generate a paper over the selected units.
pub async fn paper(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PaperRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let generator = require_generator(&state)?;
    if req.subject.trim().is_empty() {
        return Err(error_reply(StatusCode::BAD_REQUEST, "subject is required"));
    }
    if req.units.is_empty() {
        return Err(error_reply(
            StatusCode::BAD_REQUEST,
            "select at least one unit",
        ));
    }

    let plan = PaperPlan {
        part_a: req.part_a,
        part_b: req.part_b,
        part_c: req.part_c,
    };
    let paper = generator
        .generate_paper(req.subject.trim(), &req.units, &plan)
        .await
        .map_err(generation_error)?;

    Ok(Json(json!({
        "subject": req.subject.trim(),
        "total_marks": plan.total_marks(),
        "paper": paper,
    })))
}
