//! Status command implementation.

use anyhow::{Context, Result};

use qupacabras_index::IndexBuilder;

use super::common::{ConfigArgs, load_config};

/// Execute the status command: print the Markdown status section.
///
/// Invalid submissions are listed in the output, not reported as failure.
pub fn execute(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args)?;
    let report = IndexBuilder::new(config)
        .validate_all()
        .context("Validation aborted")?;

    print!("{}", report.status_markdown());
    Ok(())
}
