//! Poster generation core
//!
//! Deployment-agnostic: validate, render the template prompt, call the
//! provider once, pull the first inline image out of the response.
//! Adapters own the wire formats.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::error::RelayError;
use crate::gemini::{GenerateContentRequest, ImageProvider, ProviderError};
use crate::templates;

/// MIME type of both the uploaded photo and the generated poster
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Incoming request, as sent by clients. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub base64_image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template_name: Option<String>,
}

/// Successful outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPoster {
    pub status: &'static str,
    pub base64_poster: String,
}

impl GeneratedPoster {
    fn new(base64_poster: String) -> Self {
        Self {
            status: "success",
            base64_poster,
        }
    }
}

/// Generate a poster from a product photo and description
pub async fn generate_poster(
    provider: &dyn ImageProvider,
    request: &GenerationRequest,
) -> Result<GeneratedPoster, RelayError> {
    let span = info_span!(
        "generate_poster",
        request_id = %Uuid::new_v4(),
        template = request.template_name.as_deref().unwrap_or("")
    );
    run(provider, request).instrument(span).await
}

async fn run(
    provider: &dyn ImageProvider,
    request: &GenerationRequest,
) -> Result<GeneratedPoster, RelayError> {
    if !provider.is_configured() {
        return Err(RelayError::Configuration(
            "Gemini API key not configured".to_string(),
        ));
    }

    let (image, description, template) = validate(request)?;
    let prompt = template.prompt(description);
    let payload =
        GenerateContentRequest::image_and_text(image, IMAGE_MIME_TYPE, &prompt, IMAGE_MIME_TYPE);

    debug!("Requesting poster from {}", provider.model());
    let response = provider.generate_content(&payload).await.map_err(|e| {
        error!("Gemini API error: {}", e);
        RelayError::Unavailable(e)
    })?;

    if response.first_candidate_parts().is_none() {
        let e = ProviderError::MalformedResponse("no candidate content");
        error!("Gemini API error: {}", e);
        return Err(RelayError::Unavailable(e));
    }

    let blob = response.first_inline_data().ok_or_else(|| {
        info!("Gemini response contained no image part");
        RelayError::NoImage
    })?;

    info!("Poster generated ({} base64 chars)", blob.data.len());
    Ok(GeneratedPoster::new(blob.data.clone()))
}

/// All four conditions checked together; empty strings count as missing
fn validate(
    request: &GenerationRequest,
) -> Result<(&str, &str, &'static templates::StyleTemplate), RelayError> {
    fn present(field: &Option<String>) -> Option<&str> {
        field.as_deref().filter(|s| !s.is_empty())
    }

    match (
        present(&request.base64_image),
        present(&request.description),
        present(&request.template_name).and_then(templates::find),
    ) {
        (Some(image), Some(description), Some(template)) => Ok((image, description, template)),
        _ => Err(RelayError::InvalidArgument),
    }
}
