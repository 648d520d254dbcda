use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;

use receipt_toolkit::pr_analysis::{aggregate, collect_merged_prs, parse_log, render_report};
use receipt_toolkit::telemetry::init_cli_logging;

#[derive(Parser)]
#[command(name = "analyze-prs")]
#[command(about = "Aggregate merged PRs per collaborator per week")]
struct Args {
    /// Repository to walk
    #[arg(short, long, default_value = ".")]
    repo: PathBuf,

    /// Only count merges committed within this many days
    #[arg(long, default_value_t = 183)]
    since_days: i64,

    /// Read `git log --merges --pretty=format:%H|%an|%ae|%ad|%s --date=iso`
    /// output from a file instead of walking the repository
    #[arg(long)]
    from_log: Option<PathBuf>,

    /// Where to save the report
    #[arg(short, long, default_value = "pr_analysis_report.txt")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_cli_logging(args.verbose);

    let records = match &args.from_log {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read git log from {}", path.display()))?;
            parse_log(&text)
        }
        None => {
            let since = Utc::now() - Duration::days(args.since_days);
            collect_merged_prs(&args.repo, since)?
        }
    };

    let report = render_report(&aggregate(records));
    println!("{report}");

    std::fs::write(&args.output, &report)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;

    println!("\n\nReport saved to: {}", args.output.display());
    Ok(())
}
