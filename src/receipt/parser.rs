use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fixed confidence reported for keyword/regex extraction.
pub const PARSE_CONFIDENCE: f64 = 0.85;

const MERCHANT_KEYWORDS: [&str; 4] = ["store", "shop", "market", "restaurant"];
const ITEM_KEYWORDS: [&str; 3] = ["item", "product", "service"];
const MERCHANT_SCAN_LINES: usize = 5;

static TOTAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"total[\s:]*[$€£]?\s*(\d+\.?\d*)",
        r"[$€£]\s*(\d+\.?\d*)",
        r"amount[\s:]*(\d+\.?\d*)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid total pattern"))
    .collect()
});

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d{1,2}/\d{1,2}/\d{4}",
        r"\d{1,2}-\d{1,2}-\d{4}",
        r"\d{4}-\d{2}-\d{2}",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid date pattern"))
    .collect()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub description: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFields {
    pub merchant: String,
    pub total: f64,
    pub items: Vec<ParsedItem>,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    pub parsed_data: ParsedFields,
    pub confidence: f64,
    pub raw_text: String,
}

#[tracing::instrument(name = "receipt.parse", skip(text), fields(text.len = text.len()))]
pub fn parse_receipt_text(text: &str) -> ParsedReceipt {
    ParsedReceipt {
        parsed_data: ParsedFields {
            merchant: extract_merchant(text),
            total: extract_total(text),
            items: extract_items(text),
            date: extract_date(text),
        },
        confidence: PARSE_CONFIDENCE,
        raw_text: text.to_string(),
    }
}

pub fn extract_merchant(text: &str) -> String {
    text.split('\n')
        .take(MERCHANT_SCAN_LINES)
        .find(|line| {
            let lower = line.to_lowercase();
            MERCHANT_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| "Unknown Merchant".to_string())
}

pub fn extract_total(text: &str) -> f64 {
    let lower = text.to_lowercase();
    TOTAL_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(&lower))
        .find_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()))
        .unwrap_or(0.0)
}

pub fn extract_items(text: &str) -> Vec<ParsedItem> {
    text.split('\n')
        .filter(|line| {
            let lower = line.to_lowercase();
            ITEM_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let (price, description) = parts.split_last()?;
            if description.is_empty() {
                return None;
            }
            Some(ParsedItem {
                description: description.join(" "),
                price: price.to_string(),
            })
        })
        .collect()
}

pub fn extract_date(text: &str) -> String {
    DATE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string())
}
