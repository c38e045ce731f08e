//! Registration and login handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use examgen_auth::{RegisterOutcome, Role};

use crate::state::AppState;

use super::error_reply;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(error_reply(
            StatusCode::BAD_REQUEST,
            "username and password are required",
        ));
    }

    let outcome = state
        .users
        .register(req.username.trim(), &req.password, req.role)
        .map_err(|e| {
            warn!(error = %e, "registration failed");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    match outcome {
        RegisterOutcome::Created => Ok((
            StatusCode::CREATED,
            Json(json!({ "username": req.username.trim(), "role": req.role })),
        )),
        RegisterOutcome::AlreadyExists => Err(error_reply(
            StatusCode::CONFLICT,
            "username already exists",
        )),
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let role = state
        .users
        .verify(&req.username, &req.password)
        .map_err(|e| {
            warn!(error = %e, "login check failed");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    match role {
        Some(role) => Ok(Json(json!({ "username": req.username, "role": role }))),
        None => Err(error_reply(
            StatusCode::UNAUTHORIZED,
            "invalid username or password",
        )),
    }
}
