use std::env;

use crate::error::ServiceError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
const DEFAULT_PORT: u16 = 5000;

/// Environment-provided settings, read once at startup. Construction fails
/// when the API key is absent so a misconfigured server never accepts a
/// request it cannot serve.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServiceError> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ServiceError::Configuration(
                    "GEMINI_API_KEY is not configured. Please add your Google AI API key."
                        .to_string(),
                )
            })?;
        let model = env::var("GEMINI_MODEL")
            .ok()
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            api_key,
            model,
            port,
        })
    }
}
