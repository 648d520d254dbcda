//! Invoice exporters.
//!
//! A validated invoice record is written to disk in one of several flat,
//! CSV or XML formats. Exporters are looked up by name through an
//! [`ExporterRegistry`].

pub mod csv;
pub mod json;
pub mod quickbooks;
pub mod ubl;
pub mod xero;
pub mod xml;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

pub const REQUIRED_FIELDS: [&str; 4] = ["invoice_number", "date", "amount", "customer"];

pub type InvoiceRecord = Map<String, Value>;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Amount must be a positive number")]
    InvalidAmount,

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Serializes an already validated record.
    fn write(&self, record: &InvoiceRecord, out: &mut dyn Write) -> ExportResult<()>;

    /// Validates the record, then writes it to `path`. Nothing is created on
    /// disk when validation fails.
    fn export(&self, record: &InvoiceRecord, path: &Path) -> ExportResult<()> {
        validate(record)?;

        let mut out = BufWriter::new(File::create(path)?);
        self.write(record, &mut out)?;
        out.flush()?;

        tracing::info!(
            format = self.name(),
            path = %path.display(),
            "Invoice exported"
        );

        Ok(())
    }
}

pub fn validate(record: &InvoiceRecord) -> ExportResult<()> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !record.contains_key(**field))
        .map(|field| field.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ExportError::MissingFields(missing));
    }

    match record.get("amount").and_then(Value::as_f64) {
        Some(amount) if amount >= 0.0 => Ok(()),
        _ => Err(ExportError::InvalidAmount),
    }
}

/// Renders a field value the way it appears in flat formats.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn field_or(record: &InvoiceRecord, key: &str, default: &str) -> String {
    record
        .get(key)
        .map(value_text)
        .unwrap_or_else(|| default.to_string())
}

#[derive(Clone, Default)]
pub struct ExporterRegistry {
    exporters: HashMap<String, Arc<dyn Exporter>>,
}

impl ExporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(json::JsonExporter));
        registry.register(Arc::new(csv::CsvExporter));
        registry.register(Arc::new(xml::XmlExporter));
        registry.register(Arc::new(ubl::UblExporter));
        registry.register(Arc::new(quickbooks::QuickBooksExporter));
        registry.register(Arc::new(xero::XeroExporter));
        registry
    }

    pub fn register(&mut self, exporter: Arc<dyn Exporter>) {
        self.exporters
            .insert(exporter.name().to_lowercase(), exporter);
    }

    pub fn get(&self, format: &str) -> ExportResult<Arc<dyn Exporter>> {
        self.exporters
            .get(&format.to_lowercase())
            .cloned()
            .ok_or_else(|| ExportError::UnsupportedFormat(format.to_string()))
    }

    pub fn formats(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exporters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
pub(crate) fn sample_record() -> InvoiceRecord {
    let value = serde_json::json!({
        "invoice_number": "INV-2024-001",
        "date": "2024-03-15",
        "amount": 1500.0,
        "customer": "Acme Corp",
        "due_date": "2024-04-15"
    });
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_accepts_complete_record() {
        assert!(validate(&sample_record()).is_ok());
    }

    #[test]
    fn test_validate_lists_all_missing_fields() {
        let mut record = sample_record();
        record.remove("date");
        record.remove("customer");

        let err = validate(&record).unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: date, customer");
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut record = sample_record();
        record.insert("amount".into(), json!(-1));
        assert!(matches!(validate(&record), Err(ExportError::InvalidAmount)));
    }

    #[test]
    fn test_validate_rejects_string_amount() {
        let mut record = sample_record();
        record.insert("amount".into(), json!("100"));
        assert!(matches!(validate(&record), Err(ExportError::InvalidAmount)));
    }

    #[test]
    fn test_validate_accepts_zero_amount() {
        let mut record = sample_record();
        record.insert("amount".into(), json!(0));
        assert!(validate(&record).is_ok());
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("abc")), "abc");
        assert_eq!(value_text(&json!(1500.0)), "1500.0");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(["a", 1])), r#"["a",1]"#);
    }

    #[test]
    fn test_registry_lookup_is_case_insensitive() {
        let registry = ExporterRegistry::with_defaults();
        assert_eq!(registry.get("JSON").unwrap().name(), "json");
        assert_eq!(registry.get("QuickBooks").unwrap().name(), "quickbooks");
    }

    #[test]
    fn test_registry_unknown_format() {
        let registry = ExporterRegistry::with_defaults();
        let err = registry.get("pdf").err().unwrap();
        assert_eq!(err.to_string(), "Unsupported export format: pdf");
    }

    #[test]
    fn test_registry_formats_sorted() {
        let registry = ExporterRegistry::with_defaults();
        assert_eq!(
            registry.formats(),
            vec!["csv", "json", "quickbooks", "ubl", "xero", "xml"]
        );
    }

    #[test]
    fn test_export_does_not_create_file_on_invalid_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut record = sample_record();
        record.remove("invoice_number");

        let exporter = ExporterRegistry::with_defaults().get("json").unwrap();
        assert!(exporter.export(&record, &path).is_err());
        assert!(!path.exists());
    }
}
