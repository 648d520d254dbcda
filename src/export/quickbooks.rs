use std::io::Write;

use super::{ExportResult, Exporter, InvoiceRecord, field_or};

/// QuickBooks IIF transaction block.
pub struct QuickBooksExporter;

impl Exporter for QuickBooksExporter {
    fn name(&self) -> &'static str {
        "quickbooks"
    }

    fn write(&self, record: &InvoiceRecord, out: &mut dyn Write) -> ExportResult<()> {
        writeln!(out, "!TRNS\tTRNSTYPE\tDATE\tACCNT\tAMOUNT\tNAME")?;
        writeln!(
            out,
            "TRNS\tINVOICE\t{}\tAccounts Receivable\t{}\t{}",
            field_or(record, "date", ""),
            field_or(record, "amount", ""),
            field_or(record, "customer", "Client"),
        )?;
        writeln!(out, "ENDTRNS")?;
        Ok(())
    }
}
