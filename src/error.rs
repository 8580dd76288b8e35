//! Analysis error taxonomy
//!
//! Every failure carries a stable code so API clients can branch on the
//! failure class instead of parsing message text.

use thiserror::Error;

/// Errors produced by the analysis pipeline and its collaborators
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Face analysis credentials not configured. Set FACEPP_API_KEY and FACEPP_API_SECRET.")]
    CredentialsMissing,

    #[error("Face analysis service is temporarily unavailable. Please try again in a few moments.")]
    ProviderUnavailable,

    #[error("Face analysis service returned an unexpected response. Please try again.")]
    UnexpectedResponse,

    #[error("Face analysis service authentication failed. Please verify the configured API key and secret.")]
    AuthenticationFailed,

    #[error("Face analysis request timed out. Please try again.")]
    ProviderTimeout,

    /// The client string-matches this message, keep it stable
    #[error("No face detected in the image")]
    NoFaceDetected,

    #[error("Too many concurrent analysis requests. Please wait a moment and try again.")]
    RateLimited,

    /// Semantic provider error passed through verbatim
    #[error("{0}")]
    Provider(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AnalysisError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::CredentialsMissing => "CREDENTIALS_MISSING",
            AnalysisError::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            AnalysisError::UnexpectedResponse => "UNEXPECTED_RESPONSE",
            AnalysisError::AuthenticationFailed => "AUTH_FAILED",
            AnalysisError::ProviderTimeout => "PROVIDER_TIMEOUT",
            AnalysisError::NoFaceDetected => "NO_FACE_DETECTED",
            AnalysisError::RateLimited => "CONCURRENCY_LIMIT_EXCEEDED",
            AnalysisError::Provider(_) => "PROVIDER_ERROR",
            AnalysisError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_face_message_is_stable() {
        // Mobile clients match on this exact text
        assert_eq!(
            AnalysisError::NoFaceDetected.to_string(),
            "No face detected in the image"
        );
    }

    #[test]
    fn test_rate_limit_code() {
        assert_eq!(AnalysisError::RateLimited.code(), "CONCURRENCY_LIMIT_EXCEEDED");
    }

    #[test]
    fn test_provider_message_passthrough() {
        let err = AnalysisError::Provider("INVALID_IMAGE_SIZE: image_base64".to_string());
        assert_eq!(err.to_string(), "INVALID_IMAGE_SIZE: image_base64");
        assert_eq!(err.code(), "PROVIDER_ERROR");
    }
}
