use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Assumed when the producing side omits the mime type.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("missing data: prefix")]
    MissingPrefix,
    #[error("missing ;base64, separator")]
    MissingSeparator,
    #[error("empty or malformed mime type")]
    BadMimeType,
    #[error("empty payload")]
    EmptyPayload,
    #[error("payload is not valid base64")]
    BadBase64,
}

/// An image carried inline as mime type plus raw bytes, round-trippable with
/// the `data:<mime>;base64,<payload>` string form. A value, not a resource:
/// request-scoped and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    mime_type: String,
    payload: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, payload: Vec<u8>) -> Self {
        let mut mime_type = mime_type.into();
        if mime_type.is_empty() {
            mime_type = DEFAULT_MIME_TYPE.to_string();
        }
        Self { mime_type, payload }
    }

    /// Parses a `data:<mime>;base64,<payload>` string. Rejects anything off
    /// that shape before it can reach the network boundary; does not check
    /// that the decoded bytes are a real image.
    pub fn from_data_url(s: &str) -> Result<Self, DataUrlError> {
        let rest = s.strip_prefix("data:").ok_or(DataUrlError::MissingPrefix)?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or(DataUrlError::MissingSeparator)?;
        if mime_type.is_empty() || mime_type.contains(';') || mime_type.contains(',') {
            return Err(DataUrlError::BadMimeType);
        }
        if payload.is_empty() {
            return Err(DataUrlError::EmptyPayload);
        }
        let payload = STANDARD
            .decode(payload)
            .map_err(|_| DataUrlError::BadBase64)?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            payload,
        })
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            STANDARD.encode(&self.payload)
        )
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_base64(&self) -> String {
        STANDARD.encode(&self.payload)
    }

    /// Log-safe summary: mime type and size only, never the bytes.
    pub fn describe(&self) -> String {
        format!("{} ({}KB)", self.mime_type, self.payload.len() / 1024)
    }
}
