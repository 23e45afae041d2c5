//! Per-submission validation.
//!
//! [`SubmissionValidator`] runs every check on one submission and collects
//! the outcome in a [`ValidationResult`]. Nothing short-circuits: a
//! submission with a schema error still gets its QASM files and statistics
//! checked, so authors see every problem at once.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::record::StatSummary;
use crate::schema::Schema;
use crate::stats::check_stat_summary;

/// Error-rate keys checked with the high-value flag on.
const ERROR_RATE_KEYS: [&str; 4] = ["qubit", "readout", "twoQubitGate", "singleQubitGate"];

/// A hard error; any one of these makes a submission invalid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A soft finding that never affects validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWarning {
    pub field: String,
    pub message: String,
}

/// Outcome of validating one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<FieldError>,
    pub warnings: Vec<FieldWarning>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationResult {
    /// Record a hard error and mark the result invalid.
    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.error_with_params(field, message, None);
    }

    pub fn error_with_params(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        params: Option<Value>,
    ) {
        self.valid = false;
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
            params,
        });
    }

    /// Record a warning.
    pub fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(FieldWarning {
            field: field.into(),
            message: message.into(),
        });
    }

    /// A failed result carrying a single error.
    pub fn failed(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut result = Self::default();
        result.error(field, message);
        result
    }
}

/// Validates single submissions against a shared schema.
#[derive(Debug, Clone)]
pub struct SubmissionValidator {
    schema: Arc<Schema>,
    allow_unstamped: bool,
}

impl SubmissionValidator {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            allow_unstamped: false,
        }
    }

    /// Validator for draft submissions: `id` and `timestamp` may be absent.
    pub fn for_drafts() -> Self {
        Self {
            schema: Arc::new(Schema::relaxed_for_drafts()),
            allow_unstamped: true,
        }
    }

    /// Strict or draft validator depending on `allow_unstamped`.
    pub fn with_unstamped(allow_unstamped: bool) -> Self {
        if allow_unstamped {
            Self::for_drafts()
        } else {
            Self::new(Arc::new(Schema::benchmark()))
        }
    }

    /// Validate a parsed document belonging to `folder_name`, whose QASM
    /// files live under `folder_path`.
    pub fn validate(&self, doc: &Value, folder_name: &str, folder_path: &Path) -> ValidationResult {
        let mut result = ValidationResult::default();

        for violation in self.schema.validate(doc) {
            result.error_with_params(violation.field, violation.message, violation.params);
        }

        self.check_id(doc, folder_name, &mut result);
        check_qasm_files(doc, folder_path, &mut result);
        check_quantum_specific(doc, &mut result);

        if let Some(rates) = doc.get("errorRates") {
            for key in ERROR_RATE_KEYS {
                if let Some(stats) = rates.get(key).and_then(stat_summary) {
                    check_stat_summary(&stats, &format!("errorRates.{key}"), true, &mut result);
                }
            }
        }
        if let Some(stats) = doc.get("executionTime").and_then(stat_summary) {
            check_stat_summary(&stats, "executionTime", false, &mut result);
        }

        if doc.get("uncertainty").is_none_or(Value::is_null) {
            result.warn(
                "uncertainty",
                "Consider adding uncertainty/error bars for the metric",
            );
        }
        if doc.get("quantumSpecific").is_none() {
            result.warn(
                "quantumSpecific",
                "Consider adding quantum-specific properties (qubit count, gate count, etc.)",
            );
        }

        debug!(
            folder = folder_name,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Validated submission"
        );
        result
    }

    /// Read, parse and validate one record file. The folder path is the
    /// file's parent directory.
    pub fn validate_file(&self, path: &Path, folder_name: &str) -> ValidationResult {
        self.load_and_validate(path, folder_name).1
    }

    /// Like [`validate_file`](Self::validate_file), also returning the parsed
    /// document when the file could be read.
    pub fn load_and_validate(&self, path: &Path, folder_name: &str) -> (Option<Value>, ValidationResult) {
        let doc = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()));

        match doc {
            Ok(doc) => {
                let folder_path = path.parent().unwrap_or_else(|| Path::new("."));
                let result = self.validate(&doc, folder_name, folder_path);
                (Some(doc), result)
            }
            Err(e) => (
                None,
                ValidationResult::failed("file", format!("Error reading/parsing file: {e}")),
            ),
        }
    }

    fn check_id(&self, doc: &Value, folder_name: &str, result: &mut ValidationResult) {
        let shown = match doc.get("id") {
            Some(Value::String(id)) if id == folder_name => return,
            None if self.allow_unstamped => return,
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => "undefined".to_string(),
        };
        result.error(
            "id",
            format!("ID '{shown}' must match folder name '{folder_name}'"),
        );
    }
}

fn check_qasm_files(doc: &Value, folder_path: &Path, result: &mut ValidationResult) {
    let Some(files) = doc.get("qasmFiles").and_then(Value::as_array) else {
        return;
    };

    for file in files.iter().filter_map(Value::as_str) {
        let path = folder_path.join(file);
        if !path.is_file() {
            result.error("qasmFiles", format!("QASM file '{file}' not found"));
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(source) if !qupacabras_qasm::looks_like_qasm(&source) => result.warn(
                "qasmFiles",
                format!("{file} may not be valid QASM (missing standard headers)"),
            ),
            Ok(_) => {}
            Err(e) => result.error("qasmFiles", format!("QASM file '{file}' could not be read: {e}")),
        }
    }
}

fn check_quantum_specific(doc: &Value, result: &mut ValidationResult) {
    let Some(qs) = doc.get("quantumSpecific") else {
        return;
    };
    let count = |key: &str| qs.get(key).and_then(Value::as_f64);
    let Some(gates) = count("gateCount") else {
        return;
    };

    if count("circuitDepth").is_some_and(|depth| depth > gates) {
        result.warn(
            "quantumSpecific",
            "Circuit depth cannot exceed total gate count",
        );
    }
    if count("twoQubitGateCount").is_some_and(|two| two > gates) {
        result.warn(
            "quantumSpecific.twoQubitGateCount",
            "Two-qubit gate count cannot exceed total gate count",
        );
    }
}

/// Extract a numeric summary; anything malformed is left to the schema.
fn stat_summary(value: &Value) -> Option<StatSummary> {
    let get = |key: &str| value.get(key).and_then(Value::as_f64);
    Some(StatSummary {
        min: get("min")?,
        median: get("median")?,
        mean: get("mean")?,
        max: get("max")?,
    })
}
