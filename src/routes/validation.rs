use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiResponse, AppJson};
use crate::AppState;
use crate::receipt::ValidationReport;

#[derive(Debug, Deserialize)]
pub struct ValidationRequest {
    pub receipt_data: Value,
    #[serde(default)]
    pub strict_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub index: usize,
    pub valid: bool,
    pub confidence: f64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total_receipts: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub results: Vec<BatchEntry>,
}

pub async fn validate(
    State(state): State<AppState>,
    AppJson(body): AppJson<ValidationRequest>,
) -> Json<ValidationReport> {
    Json(
        state
            .service
            .validate_receipt(&body.receipt_data, body.strict_mode),
    )
}

pub async fn validate_batch(
    State(state): State<AppState>,
    AppJson(receipts): AppJson<Vec<ValidationRequest>>,
) -> Json<ApiResponse<BatchSummary>> {
    let results: Vec<BatchEntry> = receipts
        .iter()
        .enumerate()
        .map(|(index, request)| {
            let report = state
                .service
                .validate_receipt(&request.receipt_data, request.strict_mode);
            BatchEntry {
                index,
                valid: report.is_valid,
                confidence: report.confidence,
                errors: report.errors,
                warnings: report.warnings,
            }
        })
        .collect();

    let valid_count = results.iter().filter(|r| r.valid).count();
    let summary = BatchSummary {
        total_receipts: results.len(),
        valid_count,
        invalid_count: results.len() - valid_count,
        results,
    };

    ApiResponse::ok(
        format!(
            "Batch validation completed for {} receipts",
            summary.total_receipts
        ),
        summary,
    )
}
