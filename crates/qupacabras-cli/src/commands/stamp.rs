//! Stamp command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use console::style;
use tracing::info;

use qupacabras_index::record::parse_timestamp;
use qupacabras_index::stamp_metadata;

/// Execute the stamp command.
pub fn execute(file: &Path, contributor: &str, timestamp: Option<&str>) -> Result<()> {
    if !file.is_file() {
        anyhow::bail!("File not found: {}", file.display());
    }
    if contributor.trim().is_empty() {
        anyhow::bail!("Contributor must not be empty");
    }

    let timestamp = match timestamp {
        Some(raw) => parse_timestamp(raw)
            .with_context(|| format!("Invalid timestamp '{raw}', expected RFC 3339"))?,
        None => Utc::now(),
    };

    let outcome = stamp_metadata(file, contributor, timestamp)
        .with_context(|| format!("Failed to stamp {}", file.display()))?;

    if outcome.added_contributor {
        println!("{} Added contributor: {contributor}", style("✓").green().bold());
    }
    if outcome.added_timestamp {
        println!("{} Added timestamp", style("✓").green().bold());
    }
    if outcome.changed() {
        info!(
            file = %file.display(),
            contributor = outcome.added_contributor,
            timestamp = outcome.added_timestamp,
            "Stamped metadata"
        );
        println!("  Updated {}", style(file.display()).green());
    } else {
        println!("{} No changes needed for {}", style("ℹ").cyan(), file.display());
    }

    Ok(())
}
