//! Validate-all report and its Markdown rendering.

use serde::Serialize;

use crate::builder::FolderOutcome;
use crate::duplicates::DuplicateFinding;

/// Result of validating every submission folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub folders: Vec<FolderOutcome>,
    pub duplicates: Vec<DuplicateFinding>,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.folders.len()
    }

    pub fn valid_count(&self) -> usize {
        self.folders.iter().filter(|f| f.result.valid).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.total() - self.valid_count()
    }

    pub fn all_valid(&self) -> bool {
        self.invalid_count() == 0
    }

    /// Render the "Validation Status" section used in the project README.
    pub fn status_markdown(&self) -> String {
        let mut out = String::from("## Validation Status\n\n");
        out.push_str(&format!(
            "✅ **{}/{}** submissions pass validation\n",
            self.valid_count(),
            self.total()
        ));
        out.push_str(&format!(
            "🔍 **{}** potential duplicates detected\n",
            self.duplicates.len()
        ));

        if !self.all_valid() {
            out.push_str("\n### Failed Validations:\n");
            for outcome in self.folders.iter().filter(|f| !f.result.valid) {
                out.push_str(&format!("- ❌ `{}`\n", outcome.folder));
            }
        }

        if !self.duplicates.is_empty() {
            out.push_str("\n### Potential Duplicates:\n");
            for dup in &self.duplicates {
                out.push_str(&format!(
                    "- ⚠️ `{}` may duplicate `{}`\n",
                    dup.current, dup.existing
                ));
            }
        }

        out
    }
}
