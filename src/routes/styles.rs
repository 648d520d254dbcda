use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{ApiResponse, AppJson};
use crate::AppState;
use crate::error::AppResult;
use crate::styles::StyleInfo;

#[derive(Debug, Deserialize)]
pub struct CreateStyleBody {
    pub name: String,
    pub content: Map<String, Value>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateStyleBody {
    /// Style document to persist; a separate `description` fills in a
    /// missing one in `content`.
    pub fn into_content(self) -> (String, Value) {
        let mut content = self.content;
        if let Some(description) = self.description {
            content
                .entry("description")
                .or_insert(Value::String(description));
        }
        (self.name, Value::Object(content))
    }
}

pub async fn list_styles(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.service.styles().list().await?))
}

pub async fn get_style(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<StyleInfo>> {
    Ok(Json(state.service.styles().info(&name).await?))
}

pub async fn create_style(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateStyleBody>,
) -> AppResult<Json<ApiResponse>> {
    let (name, content) = body.into_content();
    let path = state.service.create_style(&name, &content).await?;

    Ok(ApiResponse::ok(
        format!("Style '{name}' created successfully"),
        json!({ "path": path }),
    ))
}

pub async fn delete_style(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse>> {
    state.service.styles().delete(&name).await?;
    Ok(ApiResponse::message(format!(
        "Style '{name}' deleted successfully"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_fills_missing_content_key() {
        let body: CreateStyleBody = serde_json::from_str(
            r#"{"name": "minimal", "content": {"font": "mono"}, "description": "Plain paper"}"#,
        )
        .unwrap();
        let (name, content) = body.into_content();

        assert_eq!(name, "minimal");
        assert_eq!(content["description"], "Plain paper");
        assert_eq!(content["font"], "mono");
    }

    #[test]
    fn test_content_description_wins() {
        let body: CreateStyleBody = serde_json::from_str(
            r#"{"name": "minimal", "content": {"description": "From content"}, "description": "Ignored"}"#,
        )
        .unwrap();
        let (_, content) = body.into_content();
        assert_eq!(content["description"], "From content");
    }
}
