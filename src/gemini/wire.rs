//! Serde types for the Gemini `generateContent` REST surface.

use serde::{Deserialize, Serialize};

use super::client::ModelRequest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<RequestPart>,
}

/// A request part is either text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

impl GenerateContentRequest {
    /// Renders one user turn: input images in their given order, then the
    /// instruction text, asking for both text and image output.
    pub fn from_model_request(request: &ModelRequest) -> Self {
        let mut parts: Vec<RequestPart> = request
            .images
            .iter()
            .map(|image| RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type().to_string(),
                    data: image.payload_base64(),
                },
            })
            .collect();
        parts.push(RequestPart::Text {
            text: request.instruction.clone(),
        });

        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

/// Response parts arrive as loose objects; text and image data are both
/// optional and checked in order by the client.
#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::InlineImage;
    use serde_json::json;

    #[test]
    fn request_serializes_images_before_instruction() {
        let request = ModelRequest {
            images: vec![
                InlineImage::new("image/png", vec![1]),
                InlineImage::new("image/jpeg", vec![2]),
            ],
            instruction: "brighten the smile".to_string(),
        };
        let value = serde_json::to_value(GenerateContentRequest::from_model_request(&request))
            .unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[2]["text"], "brighten the smile");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(
            value["generationConfig"]["responseModalities"],
            json!(["TEXT", "IMAGE"])
        );
    }

    #[test]
    fn response_parses_mixed_parts() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your enhanced photo." },
                        { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } }
                    ]
                }
            }]
        });
        let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let parts = &parsed.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("Here is your enhanced photo."));
        assert_eq!(
            parts[1].inline_data.as_ref().unwrap().data,
            "aGVsbG8="
        );
    }

    #[test]
    fn response_without_candidates_parses_to_empty_list() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
