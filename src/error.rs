//! Relay error taxonomy
//!
//! Every failure of a poster generation ends up as one of these variants.
//! Adapters translate them into their own wire shapes.

use thiserror::Error;

use crate::gemini::ProviderError;

/// Errors produced by the relay core and the auth check
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("User must be authenticated to call this function.")]
    Unauthenticated,

    #[error("Missing or invalid input parameters (image, description, or template).")]
    InvalidArgument,

    /// Detail is for logs only
    #[error("Server configuration error.")]
    Configuration(String),

    #[error("AI did not return a valid image.")]
    NoImage,

    /// Upstream failure. The source is logged, never shown to callers.
    #[error("AI Service Unavailable or Rate Limited. Please try again later.")]
    Unavailable(#[source] ProviderError),
}

impl RelayError {
    /// Callable protocol code (`unauthenticated`, `invalid-argument`, ...)
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::Unauthenticated => "unauthenticated",
            RelayError::InvalidArgument => "invalid-argument",
            RelayError::Configuration(_) | RelayError::NoImage => "internal",
            RelayError::Unavailable(_) => "unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RelayError::Unauthenticated.code(), "unauthenticated");
        assert_eq!(RelayError::InvalidArgument.code(), "invalid-argument");
        assert_eq!(RelayError::NoImage.code(), "internal");
        assert_eq!(
            RelayError::Configuration("missing key".into()).code(),
            "internal"
        );
        assert_eq!(
            RelayError::Unavailable(ProviderError::NotConfigured).code(),
            "unavailable"
        );
    }

    #[test]
    fn test_unavailable_hides_source() {
        let err = RelayError::Unavailable(ProviderError::Decode("eof at line 1".into()));
        assert!(!err.to_string().contains("eof"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
