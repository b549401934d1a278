//! Callable-function endpoint
//!
//! POST /generatePoster
//!
//! Speaks the managed-function callable protocol: the request is wrapped
//! in `{"data": ...}`, success in `{"result": ...}`, failures in
//! `{"error": {"status", "message"}}`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::error;

use super::AppState;
use crate::error::RelayError;
use crate::relay::{self, GeneratedPoster, GenerationRequest};

/// Build the callable router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generatePoster", post(generate_poster))
        .layer(CorsLayer::permissive())
}

/// Callable request envelope
#[derive(Debug, Deserialize)]
struct CallableRequest {
    #[serde(default)]
    data: Option<GenerationRequest>,
}

#[derive(Debug, Serialize)]
struct CallableResult {
    result: GeneratedPoster,
}

#[derive(Debug, Serialize)]
struct CallableError {
    error: CallableErrorBody,
}

#[derive(Debug, Serialize)]
struct CallableErrorBody {
    status: &'static str,
    message: String,
}

async fn generate_poster(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CallableRequest>, JsonRejection>,
) -> Response {
    match handle(&state, &headers, payload).await {
        Ok(poster) => (StatusCode::OK, Json(CallableResult { result: poster })).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn handle(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<CallableRequest>, JsonRejection>,
) -> Result<GeneratedPoster, RelayError> {
    state.auth.authorize(headers)?;

    let Json(envelope) = payload.map_err(|_| RelayError::InvalidArgument)?;
    let request = envelope.data.ok_or(RelayError::InvalidArgument)?;

    relay::generate_poster(state.provider.as_ref(), &request).await
}

/// Canonical status name and HTTP status for an error
fn status_for(e: &RelayError) -> (&'static str, StatusCode) {
    match e {
        RelayError::Unauthenticated => ("UNAUTHENTICATED", StatusCode::UNAUTHORIZED),
        RelayError::InvalidArgument => ("INVALID_ARGUMENT", StatusCode::BAD_REQUEST),
        RelayError::Configuration(_) | RelayError::NoImage => {
            ("INTERNAL", StatusCode::INTERNAL_SERVER_ERROR)
        }
        RelayError::Unavailable(_) => ("UNAVAILABLE", StatusCode::SERVICE_UNAVAILABLE),
    }
}

fn error_response(e: &RelayError) -> Response {
    if let RelayError::Configuration(detail) = e {
        error!("Server configuration error: {}", detail);
    }

    let (status, http_status) = status_for(e);
    (
        http_status,
        Json(CallableError {
            error: CallableErrorBody {
                status,
                message: e.to_string(),
            },
        }),
    )
        .into_response()
}
