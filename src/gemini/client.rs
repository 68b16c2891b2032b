use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::error;

use super::wire;
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::image::InlineImage;
use crate::sanitize::redact_base64;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// One generative call: input images in order, then the instruction text.
#[derive(Debug)]
pub struct ModelRequest {
    pub images: Vec<InlineImage>,
    pub instruction: String,
}

/// A response part is either model commentary or generated image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    Image(InlineImage),
}

#[derive(Debug)]
pub struct ModelResponse {
    pub parts: Vec<ResponsePart>,
}

/// The generative capability: images plus an instruction in, a sequence of
/// text/image parts out. Implemented by [`GeminiClient`] in production and by
/// stubs in tests.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ServiceError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ServiceError> {
        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let body = wire::GenerateContentRequest::from_model_request(&request);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let classified = classify_provider_error(status.as_u16(), &text);
            error!("Gemini API error ({status}): {classified}");
            return Err(classified);
        }

        let parsed: wire::GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::upstream(e.to_string()))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(ServiceError::EmptyResponse)?;
        let content = candidate.content.ok_or(ServiceError::EmptyResponse)?;

        let mut parts = Vec::with_capacity(content.parts.len());
        for part in content.parts {
            if let Some(inline) = part.inline_data {
                let payload = STANDARD
                    .decode(inline.data.as_bytes())
                    .map_err(|e| ServiceError::upstream(format!("undecodable image data: {e}")))?;
                parts.push(ResponsePart::Image(InlineImage::new(inline.mime_type, payload)));
            } else if let Some(text) = part.text {
                parts.push(ResponsePart::Text(text));
            }
        }
        Ok(ModelResponse { parts })
    }
}

/// Single translation point from provider errors to the stable taxonomy.
/// Status codes first, then message substrings for providers that tunnel
/// auth/quota failures through generic statuses. The raw body never leaves
/// this function unredacted.
fn classify_provider_error(status: u16, body: &str) -> ServiceError {
    match status {
        401 | 403 => ServiceError::AuthenticationFailed,
        429 => ServiceError::RateLimited,
        _ => {
            let message = redact_base64(body);
            let lower = message.to_lowercase();
            if lower.contains("api key") {
                ServiceError::AuthenticationFailed
            } else if lower.contains("quota") || lower.contains("rate limit") {
                ServiceError::RateLimited
            } else {
                ServiceError::Upstream(message)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_401_and_403_classify_as_authentication() {
        assert!(matches!(
            classify_provider_error(401, "unauthorized"),
            ServiceError::AuthenticationFailed
        ));
        assert!(matches!(
            classify_provider_error(403, "forbidden"),
            ServiceError::AuthenticationFailed
        ));
    }

    #[test]
    fn http_429_classifies_as_rate_limited() {
        assert!(matches!(
            classify_provider_error(429, "slow down"),
            ServiceError::RateLimited
        ));
    }

    #[test]
    fn api_key_substring_classifies_as_authentication() {
        let body = r#"{"error": {"message": "API key not valid. Please pass a valid API key."}}"#;
        assert!(matches!(
            classify_provider_error(400, body),
            ServiceError::AuthenticationFailed
        ));
    }

    #[test]
    fn quota_substring_classifies_as_rate_limited() {
        let body = "Resource has been exhausted (e.g. check quota).";
        assert!(matches!(
            classify_provider_error(500, body),
            ServiceError::RateLimited
        ));
    }

    #[test]
    fn other_failures_wrap_with_redacted_message() {
        let payload = "iVBOR".repeat(100);
        let body = format!("internal error while processing {payload}");
        let err = classify_provider_error(503, &body);
        match err {
            ServiceError::Upstream(message) => {
                assert!(!message.contains(&payload));
                assert!(message.contains("[base64 image data"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
