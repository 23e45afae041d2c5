//! Validate command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qupacabras_index::{IndexBuilder, SubmissionValidator, ValidationReport};

use super::common::{ConfigArgs, load_config, print_findings};

/// Execute the validate command. Fails if any submission is invalid.
pub fn execute(args: &ConfigArgs, file: Option<&Path>) -> Result<()> {
    let config = load_config(args)?;

    match file {
        Some(path) => validate_file(path, config.allow_unstamped),
        None => {
            println!("{} Validating all benchmarks...", style("→").cyan().bold());
            let report = IndexBuilder::new(config)
                .validate_all()
                .context("Validation aborted")?;
            print_report(&report);

            if report.all_valid() {
                Ok(())
            } else {
                anyhow::bail!("{} submission(s) failed validation", report.invalid_count())
            }
        }
    }
}

fn validate_file(path: &Path, allow_unstamped: bool) -> Result<()> {
    let path = std::path::absolute(path)
        .with_context(|| format!("Invalid path: {}", path.display()))?;
    let folder = path
        .parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .with_context(|| format!("Cannot infer submission folder of {}", path.display()))?;

    println!(
        "{} Validating {}",
        style("→").cyan().bold(),
        style(path.display()).green()
    );
    let result = SubmissionValidator::with_unstamped(allow_unstamped).validate_file(&path, folder);

    if result.valid {
        println!("{} Valid", style("✓").green().bold());
    } else {
        println!("{} Invalid", style("✗").red().bold());
    }
    print_findings(&result);

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("{} failed validation", path.display())
    }
}

fn print_report(report: &ValidationReport) {
    for outcome in &report.folders {
        if outcome.result.valid {
            println!("{} {}: Valid", style("✓").green().bold(), outcome.folder);
        } else {
            println!("{} {}: Invalid", style("✗").red().bold(), outcome.folder);
        }
        print_findings(&outcome.result);
    }

    println!();
    if report.duplicates.is_empty() {
        println!("{} No duplicates found", style("✓").green().bold());
    } else {
        println!("{}", style("Potential duplicates found:").yellow().bold());
        for dup in &report.duplicates {
            println!(
                "   - {} may duplicate {} ({})",
                dup.current, dup.existing, dup.signature
            );
        }
    }

    println!();
    println!("{}", style("Summary:").bold());
    println!("   Total submissions: {}", report.total());
    println!("   Valid: {}", style(report.valid_count()).green());
    println!("   Invalid: {}", style(report.invalid_count()).red());
    println!("   Duplicates: {}", report.duplicates.len());
}
