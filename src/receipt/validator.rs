use serde::{Deserialize, Serialize};
use serde_json::Value;

const REQUIRED_FIELDS: [&str; 3] = ["transaction_id", "transaction_amount", "items"];
const TOTAL_TOLERANCE: f64 = 0.01;
const ERROR_PENALTY: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub confidence: f64,
}

impl ValidationReport {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        let confidence = (1.0 - errors.len() as f64 * ERROR_PENALTY).max(0.0);
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            confidence,
        }
    }
}

/// Reads a number that may be encoded as a JSON number or a numeric string.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Checks a receipt object for required fields, item shape and total
/// consistency. In strict mode every warning counts as an error.
pub fn validate_receipt(data: &Value, strict: bool) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for field in REQUIRED_FIELDS {
        if data.get(field).is_none() {
            errors.push(format!("Missing required field: {field}"));
        }
    }

    let declared_amount = data
        .get("transaction_amount")
        .and_then(|amount| amount.get("amount"));

    if let Some(amount) = declared_amount {
        if as_number(amount).is_none() {
            errors.push("Invalid amount format".to_string());
        }
    }

    if let Some(items) = data.get("items").and_then(Value::as_array) {
        for (i, item) in items.iter().enumerate() {
            let Some(item) = item.as_object() else {
                errors.push(format!("Invalid item format at index {i}"));
                continue;
            };

            if !item.contains_key("description") {
                warnings.push(format!("Item {i} missing description"));
            }
            if !item.contains_key("unit_price") {
                errors.push(format!("Item {i} missing unit price"));
            }
        }

        let calculated: Option<f64> = items
            .iter()
            .map(|item| match item.get("line_total") {
                Some(total) => as_number(total),
                None => Some(0.0),
            })
            .sum();
        let declared = match declared_amount {
            Some(amount) => as_number(amount),
            None => Some(0.0),
        };

        match (calculated, declared) {
            (Some(calculated), Some(declared)) => {
                if (calculated - declared).abs() > TOTAL_TOLERANCE {
                    warnings.push("Total amount doesn't match sum of items".to_string());
                }
            }
            _ => errors.push("Invalid total amount format".to_string()),
        }
    }

    if strict {
        errors.append(&mut warnings);
    }

    ValidationReport::from_findings(errors, warnings)
}
