//! Pre-`/api/v1` endpoint shapes kept for older clients.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::AppJson;
use super::config::ConfigUpdateBody;
use crate::AppState;
use crate::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct LegacyStyleBody {
    pub name: String,
    pub content: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyGenerationBody {
    #[serde(default)]
    pub input_fields: Option<Value>,
    #[serde(default)]
    pub style: Option<String>,
}

pub async fn current_config(State(state): State<AppState>) -> AppResult<Json<Map<String, Value>>> {
    Ok(Json(state.service.get_config().await?))
}

pub async fn update_input(
    State(state): State<AppState>,
    AppJson(body): AppJson<ConfigUpdateBody>,
) -> AppResult<Json<Value>> {
    let merged = state.service.update_config(body.fields).await?;
    Ok(Json(json!({
        "message": "✅ receipt_input.yaml updated",
        "merged": merged,
    })))
}

pub async fn create_style(
    State(state): State<AppState>,
    AppJson(body): AppJson<LegacyStyleBody>,
) -> AppResult<Json<Value>> {
    state
        .service
        .create_style(&body.name, &Value::Object(body.content))
        .await?;
    Ok(Json(json!({
        "message": format!("✅ New style {}.json created.", body.name),
    })))
}

pub async fn generate_receipt(
    State(state): State<AppState>,
    AppJson(body): AppJson<LegacyGenerationBody>,
) -> AppResult<Json<Value>> {
    let style = body
        .style
        .unwrap_or_else(|| state.config.default_style.clone());
    let receipt = state.service.generate_receipt_data(body.input_fields)?;
    let image = state
        .service
        .generate_receipt_image(&receipt, &style, None)
        .await?;

    Ok(Json(json!({
        "message": "✅ Image successfully generated",
        "b64_image": image.image_data,
    })))
}
