use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

use crate::sanitize::redact_base64;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Errors surfaced by the smile enhancement service. Caller mistakes map to
/// 400, everything else to 500; the JSON body carries the Display message.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidFormat(String),
    #[error("{0}")]
    MissingField(String),
    #[error("Modification prompt is too long (limit {max} characters)")]
    PromptTooLong { max: usize },
    #[error("{0}")]
    Configuration(String),
    #[error("Invalid API key. Please check your GEMINI_API_KEY configuration.")]
    AuthenticationFailed,
    #[error("API rate limit exceeded. Please try again in a moment.")]
    RateLimited,
    #[error("No response generated from the AI model")]
    EmptyResponse,
    #[error("No image was generated in the response")]
    NoImageProduced,
    #[error("Failed to process image: {0}")]
    Upstream(String),
}

impl ServiceError {
    /// Wraps a provider-side failure, stripping any base64 payloads from the
    /// message before it can reach a log line or response body.
    pub fn upstream(message: impl AsRef<str>) -> Self {
        Self::Upstream(redact_base64(message.as_ref()))
    }

    fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat(_) | Self::MissingField(_) | Self::PromptTooLong { .. }
        )
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        Self::upstream(err.to_string())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        if self.is_caller_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
