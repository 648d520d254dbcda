use std::io::Write;

use super::{ExportResult, Exporter, InvoiceRecord};

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, record: &InvoiceRecord, out: &mut dyn Write) -> ExportResult<()> {
        serde_json::to_writer_pretty(&mut *out, record)?;
        writeln!(out)?;
        Ok(())
    }
}
