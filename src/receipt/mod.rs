//! Synthetic receipt data: generation, text parsing and consistency checks.

pub mod faker;
pub mod generator;
pub mod model;
pub mod parser;
pub mod validator;

use thiserror::Error;

pub use generator::{GenerationOptions, GenerationOverrides, generate_receipt};
pub use model::{Receipt, ReceiptItem};
pub use parser::{ParsedReceipt, parse_receipt_text};
pub use validator::{ValidationReport, validate_receipt};

#[derive(Error, Debug, PartialEq)]
pub enum ReceiptError {
    #[error("invalid generation overrides: {0}")]
    InvalidOverrides(String),
}

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
