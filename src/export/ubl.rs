use std::io::Write;

use super::xml::{XML_DECLARATION, escape_text};
use super::{ExportResult, Exporter, InvoiceRecord, field_or};

pub const UBL_NAMESPACE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";

/// Minimal UBL 2 invoice carrying the identifier, issue date and total.
pub struct UblExporter;

impl Exporter for UblExporter {
    fn name(&self) -> &'static str {
        "ubl"
    }

    fn write(&self, record: &InvoiceRecord, out: &mut dyn Write) -> ExportResult<()> {
        let id = field_or(record, "invoice_number", "INV-001");
        let issue_date = field_or(record, "date", "2025-01-01");
        let total = field_or(record, "amount", "0");

        writeln!(out, "{XML_DECLARATION}")?;
        writeln!(
            out,
            "<Invoice xmlns=\"{UBL_NAMESPACE}\"><ID>{}</ID><IssueDate>{}</IssueDate>\
             <LegalMonetaryTotal>{}</LegalMonetaryTotal></Invoice>",
            escape_text(&id),
            escape_text(&issue_date),
            escape_text(&total),
        )?;
        Ok(())
    }
}
