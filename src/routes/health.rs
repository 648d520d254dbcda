use axum::{Json, extract::State};
use chrono::Local;
use serde_json::{Value, json};

use super::ApiResponse;
use crate::AppState;
use crate::error::AppResult;
use crate::service::ServiceStatus;

const API_VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Receipt Generator API",
        "version": API_VERSION,
        "environment": state.config.environment,
        "timestamp": Local::now().to_rfc3339(),
    }))
}

pub async fn ping() -> Json<Value> {
    Json(json!({ "pong": Local::now().to_rfc3339() }))
}

pub async fn debug_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service_version": API_VERSION,
        "platform": format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
        "environment": state.config.environment,
        "debug": !state.config.is_production(),
        "styles_dir": state.service.styles().dir().display().to_string(),
        "input_config_path": state.service.input_config().path().display().to_string(),
        "timestamp": Local::now().to_rfc3339(),
    }))
}

pub async fn health() -> Json<ApiResponse> {
    ApiResponse::ok(
        "Receipt Generator API is healthy",
        json!({
            "status": "healthy",
            "timestamp": Local::now().to_rfc3339(),
            "version": API_VERSION,
        }),
    )
}

pub async fn status(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ServiceStatus>>> {
    let status = state.service.status().await?;
    Ok(ApiResponse::ok("API status retrieved successfully", status))
}
