//! Shared helpers for CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qupacabras_index::{IndexConfig, ValidationResult};

/// Configuration sources given on the command line.
#[derive(Debug, Default)]
pub struct ConfigArgs {
    pub config: Option<PathBuf>,
    pub submissions: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub allow_unstamped: bool,
}

/// Load the index configuration. Command-line flags win over the
/// environment, which wins over the config file.
pub fn load_config(args: &ConfigArgs) -> Result<IndexConfig> {
    let mut config =
        IndexConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(dir) = &args.submissions {
        config.submissions_dir = dir.clone();
    }
    if let Some(out) = &args.output {
        config.output_file = out.clone();
    }
    if args.allow_unstamped {
        config.allow_unstamped = true;
    }

    debug!(?config, "Resolved configuration");
    Ok(config)
}

/// Print the itemised errors and warnings of one validation.
pub fn print_findings(result: &ValidationResult) {
    for err in &result.errors {
        println!("   - {}: {}", style(&err.field).red(), err.message);
    }

    if !result.warnings.is_empty() {
        println!("  {}", style("Warnings:").yellow());
        for warn in &result.warnings {
            println!("   - {}: {}", style(&warn.field).yellow(), warn.message);
        }
    }
}
