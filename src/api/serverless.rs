//! Serverless-style HTTP endpoint
//!
//! ANY /api/generate-poster
//!
//! Plain JSON in and out with `{"status", "message"}` failures. Handles
//! its own CORS pre-flight and method check, so it is routed for every
//! method.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use super::AppState;
use crate::error::RelayError;
use crate::relay::{self, GeneratedPoster, GenerationRequest};

/// Build the serverless router
pub fn router() -> Router<AppState> {
    Router::new().route("/api/generate-poster", any(generate_poster))
}

/// Headers attached to every response; bearer auth must be pre-flightable
fn cors_headers(auth_required: bool) -> [(header::HeaderName, &'static str); 3] {
    let allow_headers = if auth_required {
        "Content-Type, Authorization"
    } else {
        "Content-Type"
    };
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers),
    ]
}

/// Failure body
#[derive(Debug, Serialize)]
struct FailureResponse {
    status: &'static str,
    message: &'static str,
}

fn failure(status: StatusCode, message: &'static str) -> Response {
    (
        status,
        Json(FailureResponse {
            status: "failure",
            message,
        }),
    )
        .into_response()
}

async fn generate_poster(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let response = if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else if method != Method::POST {
        failure(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else {
        match handle(&state, &headers, body).await {
            Ok(poster) => (StatusCode::OK, Json(poster)).into_response(),
            Err(e) => error_response(&e),
        }
    };

    (cors_headers(state.auth.required), response).into_response()
}

async fn handle(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<GeneratedPoster, RelayError> {
    if !state.provider.is_configured() {
        return Err(RelayError::Configuration(
            "Gemini API key not configured".to_string(),
        ));
    }

    state.auth.authorize(headers)?;

    // Oversized bodies land here too
    let body = body.map_err(|_| RelayError::InvalidArgument)?;
    let request: GenerationRequest =
        serde_json::from_slice(&body).map_err(|_| RelayError::InvalidArgument)?;

    relay::generate_poster(state.provider.as_ref(), &request).await
}

fn error_response(e: &RelayError) -> Response {
    match e {
        RelayError::Unauthenticated => failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
        RelayError::InvalidArgument => failure(
            StatusCode::BAD_REQUEST,
            "Missing or invalid input parameters.",
        ),
        RelayError::Configuration(detail) => {
            error!("Server configuration error: {}", detail);
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error.",
            )
        }
        RelayError::NoImage => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "AI did not return a valid image.",
        ),
        RelayError::Unavailable(_) => failure(
            StatusCode::SERVICE_UNAVAILABLE,
            "AI Service Temporarily Unavailable or Rate Limited.",
        ),
    }
}
