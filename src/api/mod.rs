//! HTTP API module - poster endpoints and service metadata

mod callable;
mod serverless;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::auth::AuthPolicy;
use crate::gemini::ImageProvider;
use crate::templates;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ImageProvider>,
    pub auth: Arc<AuthPolicy>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ImageProvider>, auth: AuthPolicy) -> Self {
        Self {
            provider,
            auth: Arc::new(auth),
        }
    }
}

/// Build the API router
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .route("/templates", get(list_templates))
        .merge(callable::router())
        .merge(serverless::router())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "posterd",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Available poster styles
async fn list_templates() -> impl IntoResponse {
    Json(TemplatesResponse {
        templates: templates::names(),
    })
}

#[derive(Serialize)]
struct TemplatesResponse {
    templates: Vec<&'static str>,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.provider.is_configured() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                provider: "configured",
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                provider: "missing_api_key",
            }),
        )
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    provider: &'static str,
}
