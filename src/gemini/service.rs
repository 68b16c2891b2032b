use std::sync::Arc;

use log::info;

use super::client::{GenerativeModel, ModelRequest, ResponsePart};
use crate::error::ServiceError;
use crate::image::InlineImage;

/// Longest modification prompt accepted, counted in chars after trimming.
pub const MAX_PROMPT_CHARS: usize = 2000;

const SMILE_ENHANCEMENT_PROMPT: &str = "\
You are an expert dental aesthetics AI. Your task is to enhance the smile in this photo while maintaining the person's natural appearance.

Instructions:
1. Improve the teeth appearance: make them whiter, straighter, and more symmetrical
2. Enhance the smile to look natural and beautiful
3. Keep the rest of the face and image exactly the same
4. Maintain the original lighting, colors, and style of the photo
5. The result should look realistic and achievable through dental treatments

Create a beautiful, natural-looking smile transformation that shows what professional dental aesthetics could achieve.";

const MODIFY_PREAMBLE: &str = "\
You are an expert photo retouching AI. You are given two images.

Image 1 is the original photo of the person. It is the immutable reference for their identity: face shape, skin, features and likeness must always match image 1.
Image 2 is the current edited result. It is the base image to modify.

Apply only the change requested below to image 2. Leave every other aspect of image 2 untouched, and keep the result realistic with the same lighting, colors, and style.

Requested change: ";

/// Drives one generative call per request. Stateless: the caller resends the
/// original photo and the latest result on every modification, so repeated
/// edits stay anchored to the person's true likeness instead of drifting
/// across the edit chain.
#[derive(Clone)]
pub struct SmileService {
    model: Arc<dyn GenerativeModel>,
}

impl SmileService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Produces the enhanced-smile variant of `source`.
    pub async fn enhance(&self, source: InlineImage) -> Result<InlineImage, ServiceError> {
        info!("Enhancing smile for {}", source.describe());
        let request = ModelRequest {
            images: vec![source],
            instruction: SMILE_ENHANCEMENT_PROMPT.to_string(),
        };
        self.generate_image(request).await
    }

    /// Applies one free-text edit to `current`, with `original` always sent
    /// first as the identity reference.
    pub async fn modify(
        &self,
        original: InlineImage,
        current: InlineImage,
        instruction: &str,
    ) -> Result<InlineImage, ServiceError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(ServiceError::MissingField(
                "No modification prompt provided".to_string(),
            ));
        }
        if instruction.chars().count() > MAX_PROMPT_CHARS {
            return Err(ServiceError::PromptTooLong {
                max: MAX_PROMPT_CHARS,
            });
        }

        info!(
            "Modifying image (original {}, current {})",
            original.describe(),
            current.describe()
        );
        let request = ModelRequest {
            images: vec![original, current],
            instruction: format!("{MODIFY_PREAMBLE}{instruction}"),
        };
        self.generate_image(request).await
    }

    async fn generate_image(&self, request: ModelRequest) -> Result<InlineImage, ServiceError> {
        let response = self.model.generate(request).await?;
        response
            .parts
            .into_iter()
            .find_map(|part| match part {
                ResponsePart::Image(image) => Some(image),
                ResponsePart::Text(_) => None,
            })
            .ok_or(ServiceError::NoImageProduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::client::testing::StubModel;

    fn png(byte: u8) -> InlineImage {
        InlineImage::new("image/png", vec![byte; 16])
    }

    #[actix_web::test]
    async fn enhance_returns_the_first_image_part_unchanged() {
        let produced = InlineImage::new("image/jpeg", vec![9, 9, 9]);
        let stub = Arc::new(StubModel::with_parts(vec![
            ResponsePart::Text("Here you go!".to_string()),
            ResponsePart::Image(produced.clone()),
            ResponsePart::Image(png(1)),
        ]));
        let service = SmileService::new(stub.clone());

        let result = service.enhance(png(7)).await.unwrap();
        assert_eq!(result, produced);

        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].images, vec![png(7)]);
        assert_eq!(requests[0].instruction, SMILE_ENHANCEMENT_PROMPT);
    }

    #[actix_web::test]
    async fn enhance_fails_when_only_text_comes_back() {
        let stub = Arc::new(StubModel::with_parts(vec![ResponsePart::Text(
            "I cannot edit this image.".to_string(),
        )]));
        let service = SmileService::new(stub);

        let err = service.enhance(png(7)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NoImageProduced));
    }

    #[actix_web::test]
    async fn every_modify_call_anchors_to_the_original_image() {
        let original = png(0);
        let stub = Arc::new(StubModel::with_parts(vec![ResponsePart::Image(png(9))]));
        let service = SmileService::new(stub.clone());

        let mut current = png(1);
        for step in 0..3u8 {
            current = service
                .modify(original.clone(), current.clone(), "whiten a little more")
                .await
                .unwrap();
            let requests = stub.requests.lock().unwrap();
            let sent = &requests[step as usize].images;
            assert_eq!(sent[0], original, "step {step} must lead with the original");
            assert_eq!(sent.len(), 2);
        }

        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        // steps 2 and 3 edit the previous output, not the first upload
        assert_eq!(requests[1].images[1], png(9));
        assert_eq!(requests[2].images[1], png(9));
    }

    #[actix_web::test]
    async fn modify_appends_the_instruction_verbatim() {
        let stub = Arc::new(StubModel::with_parts(vec![ResponsePart::Image(png(9))]));
        let service = SmileService::new(stub.clone());

        service
            .modify(png(0), png(1), "  add a slight gap between the front teeth ")
            .await
            .unwrap();

        let requests = stub.requests.lock().unwrap();
        assert!(requests[0]
            .instruction
            .ends_with("Requested change: add a slight gap between the front teeth"));
    }

    #[actix_web::test]
    async fn blank_instruction_is_rejected_before_any_call() {
        let stub = Arc::new(StubModel::with_parts(vec![ResponsePart::Image(png(9))]));
        let service = SmileService::new(stub.clone());

        let err = service.modify(png(0), png(1), "   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingField(_)));
        assert_eq!(stub.call_count(), 0);
    }

    #[actix_web::test]
    async fn overlong_instruction_is_rejected_before_any_call() {
        let stub = Arc::new(StubModel::with_parts(vec![ResponsePart::Image(png(9))]));
        let service = SmileService::new(stub.clone());

        let prompt = "w".repeat(MAX_PROMPT_CHARS + 1);
        let err = service.modify(png(0), png(1), &prompt).await.unwrap_err();
        assert!(matches!(err, ServiceError::PromptTooLong { .. }));
        assert_eq!(stub.call_count(), 0);
    }
}
