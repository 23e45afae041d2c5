//! Build-index command implementation.

use anyhow::{Context, Result};
use console::style;

use qupacabras_index::{FolderStatus, IndexBuilder};

use super::common::{ConfigArgs, load_config, print_findings};

/// Execute the build-index command.
///
/// Rejected submissions are reported but do not fail the command; only a
/// missing submissions directory or an unwritable output does.
pub fn execute(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args)?;
    println!(
        "{} Scanning {}",
        style("→").cyan().bold(),
        style(config.submissions_dir.display()).green()
    );

    let outcome = IndexBuilder::new(config)
        .build()
        .context("Failed to build benchmark index")?;

    for folder in &outcome.folders {
        match folder.status {
            FolderStatus::Accepted => {
                println!("{} {}", style("✓").green().bold(), folder.folder);
            }
            FolderStatus::Rejected => {
                println!("{} {}: rejected", style("✗").red().bold(), folder.folder);
            }
            FolderStatus::Missing => {
                println!(
                    "{} {}: no benchmark.json found",
                    style("!").yellow().bold(),
                    folder.folder
                );
            }
        }
        print_findings(&folder.result);
    }

    if !outcome.duplicates.is_empty() {
        println!();
        println!("{}", style("Potential duplicates:").yellow().bold());
        for dup in &outcome.duplicates {
            println!(
                "   - {} may duplicate {} ({})",
                dup.current, dup.existing, dup.signature
            );
        }
    }

    println!();
    println!(
        "{} Generated {} with {} benchmarks",
        style("✓").green().bold(),
        style(outcome.output_path.display()).green(),
        outcome.records.len()
    );
    println!(
        "   Rejected: {}  Skipped: {}  Duplicates: {}",
        outcome.count(FolderStatus::Rejected),
        outcome.count(FolderStatus::Missing),
        outcome.duplicates.len()
    );

    Ok(())
}
