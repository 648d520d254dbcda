use axum::{Json, extract::State};
use chrono::Local;
use serde::{Deserialize, Serialize};

use super::AppJson;
use crate::AppState;
use crate::receipt::ParsedReceipt;

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub receipt_text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractionMetadata {
    pub language: String,
    pub text_length: usize,
    pub parsed_at: String,
}

#[derive(Debug, Serialize)]
pub struct ParsingResult {
    #[serde(flatten)]
    pub result: ParsedReceipt,
    pub extraction_metadata: ExtractionMetadata,
}

pub async fn parse(
    State(state): State<AppState>,
    AppJson(body): AppJson<ParseRequest>,
) -> Json<ParsingResult> {
    let result = state.service.parse_receipt_data(&body.receipt_text);

    Json(ParsingResult {
        extraction_metadata: ExtractionMetadata {
            language: body.language,
            text_length: body.receipt_text.chars().count(),
            parsed_at: Local::now().to_rfc3339(),
        },
        result,
    })
}
