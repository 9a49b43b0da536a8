//! HTTP server setup with Axum

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::State,
    handler::HandlerWithoutStateExt,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

use super::pages;
use super::rest::{admin, login, ApiError};
use super::state::AppState;
use crate::utils::time::now_iso8601;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let public_dir = state.config.public_dir.clone();

    // `/` resolves to public/index.html; anything that is neither a route
    // nor a file under public/ gets the 404 page
    let static_files = ServeDir::new(&public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(pages::not_found.into_service());

    Router::new()
        .route("/login", post(login::submit_login))
        .route("/admin/logs", get(admin::get_logs))
        .route("/dashboard", get(pages::dashboard))
        .route("/health", get(health_check))
        .fallback_service(static_files)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Response for GET /health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// Seconds since startup
    pub uptime: f64,
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now_iso8601(),
        uptime: state.uptime_secs(),
    })
}

/// Turn a handler panic into a generic 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::internal("Internal server error")),
    )
        .into_response()
}
