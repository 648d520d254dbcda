use std::io::Write;

use super::{ExportResult, Exporter, InvoiceRecord, value_text};

/// One header row of field names followed by one row of values.
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&self, record: &InvoiceRecord, out: &mut dyn Write) -> ExportResult<()> {
        let mut writer = ::csv::Writer::from_writer(out);
        writer.write_record(record.keys())?;
        writer.write_record(record.values().map(value_text))?;
        writer.flush()?;
        Ok(())
    }
}
