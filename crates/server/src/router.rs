//! HTTP router construction.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api;
use crate::state::AppState;

/// Uploads are PDFs; anything larger than this is rejected outright.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api/auth/register", post(api::auth::register))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/syllabus", get(api::syllabus::list))
        .route("/api/syllabus/{subject}", put(api::syllabus::upload))
        .route("/api/sync", post(api::sync::start))
        .route("/api/sync/jobs", get(api::sync::list))
        .route("/api/sync/jobs/{id}", get(api::sync::get))
        .route("/api/exam/units", post(api::exam::units))
        .route("/api/exam/paper", post(api::exam::paper))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
