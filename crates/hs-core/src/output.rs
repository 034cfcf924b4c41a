//! Run summary output on stdout.

use crate::lifecycle::RunSummary;
use clap::ValueEnum;

/// Supported output formats for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Short human-readable lines.
    #[default]
    Text,

    /// Structured JSON for machine consumption.
    Json,
}

/// Print the run summary to stdout.
pub fn print_summary(format: OutputFormat, summary: &RunSummary) {
    match format {
        OutputFormat::Text => {
            println!(
                "{} complete: {} entries, {} staged",
                summary.mode, summary.entries, summary.staged
            );
            if let Some(extracted) = summary.extracted {
                println!("extracted {extracted} files");
            }
            if let Some(restore) = &summary.restore {
                println!(
                    "restored {} backups ({} entries had none)",
                    restore.restored, restore.skipped
                );
            }
            println!(
                "services recycled: {}/{}",
                summary.recycle.succeeded, summary.recycle.attempted
            );
            for failure in &summary.recycle.failures {
                println!("  recycle failed for {}: {}", failure.service, failure.reason);
            }
            if summary.cleanup.complete {
                println!(
                    "cleanup: deleted {} artifacts in {} attempt(s)",
                    summary.cleanup.deleted, summary.cleanup.attempts
                );
            } else {
                println!(
                    "cleanup incomplete after {} attempts; remove manually:",
                    summary.cleanup.attempts
                );
                for path in &summary.cleanup.remaining {
                    println!("  {}", path.display());
                }
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("failed to serialize summary: {e}"),
        },
    }
}
