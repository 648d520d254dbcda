use std::io::Write;

use super::{ExportResult, Exporter, InvoiceRecord, field_or};

const HEADER: [&str; 4] = ["InvoiceNumber", "Date", "DueDate", "Amount"];

/// Xero sales invoice CSV import layout.
pub struct XeroExporter;

impl Exporter for XeroExporter {
    fn name(&self) -> &'static str {
        "xero"
    }

    fn write(&self, record: &InvoiceRecord, out: &mut dyn Write) -> ExportResult<()> {
        let row = [
            field_or(record, "invoice_number", "INV-001"),
            field_or(record, "date", "2025-01-01"),
            field_or(record, "due_date", "2025-01-31"),
            field_or(record, "amount", "0"),
        ];

        let mut writer = ::csv::Writer::from_writer(out);
        writer.write_record(HEADER)?;
        writer.write_record(&row)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::sample_record;

    #[test]
    fn test_xero_row() {
        let mut buf = Vec::new();
        XeroExporter.write(&sample_record(), &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "InvoiceNumber,Date,DueDate,Amount\nINV-2024-001,2024-03-15,2024-04-15,1500.0\n"
        );
    }

    #[test]
    fn test_xero_default_due_date() {
        let mut record = sample_record();
        record.remove("due_date");

        let mut buf = Vec::new();
        XeroExporter.write(&record, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains(",2025-01-31,"));
    }
}
