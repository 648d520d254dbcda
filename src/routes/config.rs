use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ApiResponse, AppJson};
use crate::AppState;
use crate::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct ConfigUpdateBody {
    pub fields: Map<String, Value>,
}

pub async fn get_config(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Map<String, Value>>>> {
    let config = state.service.get_config().await?;
    Ok(ApiResponse::ok("Configuration retrieved successfully", config))
}

pub async fn update_config(
    State(state): State<AppState>,
    AppJson(body): AppJson<ConfigUpdateBody>,
) -> AppResult<Json<ApiResponse<Map<String, Value>>>> {
    let merged = state.service.update_config(body.fields).await?;
    Ok(ApiResponse::ok("Configuration updated successfully", merged))
}
