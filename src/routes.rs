use actix_web::{HttpResponse, web};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ServiceError;
use crate::gemini::SmileService;
use crate::image::InlineImage;
use crate::sanitize::redact_base64;

#[derive(Deserialize)]
struct EnhanceBody {
    image: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModifyBody {
    original_image: Option<String>,
    current_result_image: Option<String>,
    user_prompt: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceResponse {
    enhanced_image: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModifyResponse {
    modified_image: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/enhance-smile").route(web::post().to(handle_enhance)))
        .service(web::resource("/api/modify-image").route(web::post().to(handle_modify)));
}

/// Inline photos blow past the default JSON limit; malformed bodies still get
/// the same `{ "error": ... }` shape as field-level validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(20 * 1024 * 1024)
        .error_handler(|err, _req| {
            let message = redact_base64(&err.to_string());
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(json!({ "error": message })),
            )
            .into()
        })
}

async fn handle_enhance(
    service: web::Data<SmileService>,
    body: web::Json<EnhanceBody>,
) -> Result<HttpResponse, ServiceError> {
    let image = body
        .into_inner()
        .image
        .ok_or_else(|| ServiceError::MissingField("No image provided".to_string()))?;

    if !image.starts_with("data:image/") {
        return Err(ServiceError::InvalidFormat(
            "Invalid image format".to_string(),
        ));
    }
    let source = parse_image_field(&image, "image")?;

    let enhanced = service.enhance(source).await.map_err(|e| {
        error!("Enhance smile error: {e}");
        e
    })?;

    Ok(HttpResponse::Ok().json(EnhanceResponse {
        enhanced_image: enhanced.to_data_url(),
    }))
}

async fn handle_modify(
    service: web::Data<SmileService>,
    body: web::Json<ModifyBody>,
) -> Result<HttpResponse, ServiceError> {
    let body = body.into_inner();

    let original = body
        .original_image
        .ok_or_else(|| ServiceError::MissingField("No original image provided".to_string()))?;
    let current = body.current_result_image.ok_or_else(|| {
        ServiceError::MissingField("No current result image provided".to_string())
    })?;
    let prompt = body
        .user_prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            ServiceError::MissingField("No modification prompt provided".to_string())
        })?;

    let original = parse_image_field(&original, "originalImage")?;
    let current = parse_image_field(&current, "currentResultImage")?;

    let modified = service
        .modify(original, current, &prompt)
        .await
        .map_err(|e| {
            error!("Modify image error: {e}");
            e
        })?;

    Ok(HttpResponse::Ok().json(ModifyResponse {
        modified_image: modified.to_data_url(),
    }))
}

fn parse_image_field(value: &str, field: &str) -> Result<InlineImage, ServiceError> {
    InlineImage::from_data_url(value)
        .map_err(|e| ServiceError::InvalidFormat(format!("Invalid {field} format: {e}")))
}
