use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiResponse, AppJson};
use crate::AppState;
use crate::error::AppResult;
use crate::receipt::Receipt;
use crate::service::ReceiptService;

fn default_include_image() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub input_fields: Option<Value>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default = "default_include_image")]
    pub include_image: bool,
    #[serde(default)]
    pub image_config: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GenerationResult {
    pub receipt_data: Receipt,
    pub image_data: Option<String>,
    pub prompt: Option<String>,
    pub style: String,
    pub metadata: Value,
}

pub async fn generate(
    State(state): State<AppState>,
    AppJson(body): AppJson<GenerationRequest>,
) -> AppResult<Json<GenerationResult>> {
    let style = body
        .style
        .unwrap_or_else(|| state.config.default_style.clone());
    let receipt = state.service.generate_receipt_data(body.input_fields)?;

    if !body.include_image {
        return Ok(Json(GenerationResult {
            receipt_data: receipt,
            image_data: None,
            prompt: None,
            metadata: ReceiptService::data_only_metadata(&style),
            style,
        }));
    }

    let image = state
        .service
        .generate_receipt_image(&receipt, &style, body.image_config)
        .await?;

    Ok(Json(GenerationResult {
        receipt_data: receipt,
        image_data: Some(image.image_data),
        prompt: Some(image.prompt),
        metadata: serde_json::to_value(image.metadata).unwrap_or_default(),
        style,
    }))
}

pub async fn generate_data(
    State(state): State<AppState>,
    AppJson(body): AppJson<GenerationRequest>,
) -> AppResult<Json<ApiResponse<Receipt>>> {
    let receipt = state.service.generate_receipt_data(body.input_fields)?;
    Ok(ApiResponse::ok("Receipt data generated successfully", receipt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_request_defaults() {
        let body: GenerationRequest = serde_json::from_str("{}").unwrap();
        assert!(body.include_image);
        assert!(body.style.is_none());
        assert!(body.input_fields.is_none());
        assert!(body.image_config.is_none());
    }

    #[test]
    fn test_generation_request_with_values() {
        let body: GenerationRequest = serde_json::from_str(
            r#"{"input_fields": {"merchant_name": "Chez Paul"}, "style": "minimal", "include_image": false}"#,
        )
        .unwrap();
        assert!(!body.include_image);
        assert_eq!(body.style.as_deref(), Some("minimal"));
        assert_eq!(body.input_fields.unwrap()["merchant_name"], "Chez Paul");
    }
}
