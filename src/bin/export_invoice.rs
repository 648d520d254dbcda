use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use serde_json::Value;

use receipt_toolkit::export::ExporterRegistry;
use receipt_toolkit::telemetry::init_cli_logging;

#[derive(Parser)]
#[command(name = "export-invoice")]
#[command(about = "Export an invoice record to an accounting format")]
struct Args {
    /// Target format (json, csv, xml, ubl, quickbooks, xero)
    #[arg(short, long, required_unless_present = "list_formats")]
    format: Option<String>,

    /// JSON file holding the invoice record
    #[arg(short, long, required_unless_present = "list_formats")]
    input: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, required_unless_present = "list_formats")]
    output: Option<PathBuf>,

    /// Print the supported formats and exit
    #[arg(long)]
    list_formats: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_cli_logging(args.verbose);

    let registry = ExporterRegistry::with_defaults();

    if args.list_formats {
        for format in registry.formats() {
            println!("{format}");
        }
        return Ok(());
    }

    let (Some(format), Some(input), Some(output)) = (args.format, args.input, args.output) else {
        bail!("--format, --input and --output are required");
    };

    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read invoice from {}", input.display()))?;
    let record = match serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", input.display()))?
    {
        Value::Object(record) => record,
        _ => bail!("{} must contain a JSON object", input.display()),
    };

    let exporter = registry.get(&format)?;
    exporter
        .export(&record, &output)
        .with_context(|| format!("Failed to export invoice as {}", exporter.name()))?;

    println!("Invoice exported to: {}", output.display());
    Ok(())
}
